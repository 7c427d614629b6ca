use bytes::Bytes;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::courses::{CreateCourseRequest, UpdateCourseRequest},
    entity::{
        Categories, categories, chapters,
        courses::{ActiveModel, DemoVideo, Model as CourseModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_instructor},
    repository::{Page, course_repository::CourseWithCategory, now},
    routes::params::ListParams,
    state::AppState,
};

/// A course with the display names clients need next to it.
#[derive(Debug, Clone)]
pub struct CourseRecord {
    pub course: CourseModel,
    pub category_name: Option<String>,
    pub instructor_name: Option<String>,
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

/// Upper bound for a course price, in minor units.
pub const MAX_PRICE: i64 = 10_000_000_000;

fn check_price(price: i64) -> AppResult<i64> {
    if price < 0 {
        return Err(AppError::BadRequest("Price must not be negative".into()));
    }
    if price > MAX_PRICE {
        return Err(AppError::BadRequest(format!("Price must not exceed {MAX_PRICE}")));
    }
    Ok(price)
}

async fn listed_category(state: &AppState, category_id: Uuid) -> AppResult<categories::Model> {
    match state.categories().find_by_id(category_id).await? {
        Some(category) if category.is_listed => Ok(category),
        _ => Err(AppError::not_found("Category")),
    }
}

/// The course with `course_id`, provided `user` is the instructor who owns it.
pub async fn owned_course(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<CourseModel> {
    ensure_instructor(user)?;
    let course = state
        .courses()
        .find_by_id(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))?;
    if course.instructor_id != user.user_id {
        return Err(AppError::Forbidden);
    }
    Ok(course)
}

/// A published course students may interact with.
pub async fn available_course(state: &AppState, course_id: Uuid) -> AppResult<CourseModel> {
    state
        .courses()
        .find_published(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))
}

async fn with_instructor_names(
    state: &AppState,
    page: Page<CourseWithCategory>,
) -> AppResult<Page<CourseRecord>> {
    let mut ids: Vec<Uuid> = page.data.iter().map(|(course, _)| course.instructor_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let names = state.users().names_by_ids(&ids).await?;

    Ok(page.map(|(course, category)| CourseRecord {
        instructor_name: names.get(&course.instructor_id).cloned(),
        category_name: category.map(|c| c.category_name),
        course,
    }))
}

pub async fn create_course(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCourseRequest,
) -> AppResult<CourseModel> {
    ensure_instructor(user)?;
    let title = required(&payload.title, "Title")?;
    let level = required(&payload.level, "Level")?;
    let price = check_price(payload.price)?;
    listed_category(state, payload.category_id).await?;

    let created_at = now();
    let course = state
        .courses()
        .create(ActiveModel {
            id: Set(Uuid::new_v4()),
            instructor_id: Set(user.user_id),
            category_id: Set(payload.category_id),
            title: Set(title),
            description: Set(payload.description.trim().to_string()),
            price: Set(price),
            level: Set(level),
            thumbnail_key: Set(None),
            demo_video: Set(None),
            is_published: Set(false),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        })
        .await?;

    audit::record(
        state,
        user.user_id,
        "course_create",
        "courses",
        serde_json::json!({ "course_id": course.id }),
    )
    .await;
    Ok(course)
}

pub async fn list_instructor_courses(
    state: &AppState,
    user: &AuthUser,
    params: &ListParams,
) -> AppResult<Page<CourseRecord>> {
    ensure_instructor(user)?;
    let page = state
        .courses()
        .list_by_instructor(user.user_id, &params.search, params.page, params.limit)
        .await?;
    with_instructor_names(state, page).await
}

pub async fn get_instructor_course(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
) -> AppResult<CourseRecord> {
    let course = owned_course(state, user, course_id).await?;
    let category = state.categories().find_by_id(course.category_id).await?;
    let instructor = state.users().find_by_id(course.instructor_id).await?;
    Ok(CourseRecord {
        course,
        category_name: category.map(|c| c.category_name),
        instructor_name: instructor.map(|u| u.name),
    })
}

pub async fn update_course(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    payload: UpdateCourseRequest,
) -> AppResult<CourseModel> {
    owned_course(state, user, course_id).await?;

    let mut patch = ActiveModel::default();
    if let Some(title) = payload.title {
        patch.title = Set(required(&title, "Title")?);
    }
    if let Some(description) = payload.description {
        patch.description = Set(description.trim().to_string());
    }
    if let Some(price) = payload.price {
        patch.price = Set(check_price(price)?);
    }
    if let Some(level) = payload.level {
        patch.level = Set(required(&level, "Level")?);
    }
    if let Some(category_id) = payload.category_id {
        listed_category(state, category_id).await?;
        patch.category_id = Set(category_id);
    }
    patch.updated_at = Set(now());

    state
        .courses()
        .update(course_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))
}

// TODO: remove the course's stored media once ObjectStorage grows a delete operation.
pub async fn delete_course(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<CourseModel> {
    owned_course(state, user, course_id).await?;
    let deleted = state
        .courses()
        .delete(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))?;

    audit::record(
        state,
        user.user_id,
        "course_delete",
        "courses",
        serde_json::json!({ "course_id": course_id }),
    )
    .await;
    Ok(deleted)
}

/// Flip `is_published`; publishing needs at least one chapter.
pub async fn toggle_publish(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<CourseModel> {
    let course = owned_course(state, user, course_id).await?;
    if !course.is_published && state.chapters().count_for_course(course_id).await? == 0 {
        return Err(AppError::BadRequest(
            "A course needs at least one chapter before it can be published".into(),
        ));
    }

    let patch = ActiveModel {
        is_published: Set(!course.is_published),
        updated_at: Set(now()),
        ..Default::default()
    };
    state
        .courses()
        .update(course_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))
}

pub(crate) fn check_upload(body: &Bytes, content_type: &str, kind: &str) -> AppResult<()> {
    if body.is_empty() {
        return Err(AppError::BadRequest("File is required".into()));
    }
    if !content_type.starts_with(&format!("{kind}/")) {
        return Err(AppError::BadRequest(format!("Expected a {kind} file, got {content_type}")));
    }
    Ok(())
}

pub async fn upload_thumbnail(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    content_type: &str,
    body: Bytes,
) -> AppResult<CourseModel> {
    owned_course(state, user, course_id).await?;
    check_upload(&body, content_type, "image")?;

    let key = state
        .storage
        .upload(body, content_type, &format!("courses/{course_id}/thumbnail"))
        .await?;
    let patch = ActiveModel {
        thumbnail_key: Set(Some(key)),
        updated_at: Set(now()),
        ..Default::default()
    };
    state
        .courses()
        .update(course_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))
}

pub async fn upload_demo_video(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    content_type: &str,
    body: Bytes,
) -> AppResult<CourseModel> {
    owned_course(state, user, course_id).await?;
    check_upload(&body, content_type, "video")?;

    let size_bytes = body.len() as i64;
    let key = state
        .storage
        .upload(body, content_type, &format!("courses/{course_id}/demo"))
        .await?;
    let patch = ActiveModel {
        demo_video: Set(Some(DemoVideo {
            key,
            content_type: content_type.to_string(),
            size_bytes,
        })),
        updated_at: Set(now()),
        ..Default::default()
    };
    state
        .courses()
        .update(course_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))
}

pub async fn list_published_courses(
    state: &AppState,
    params: &ListParams,
    category_id: Option<Uuid>,
) -> AppResult<Page<CourseRecord>> {
    let page = state
        .courses()
        .list_published(&params.search, category_id, params.page, params.limit)
        .await?;
    with_instructor_names(state, page).await
}

/// A published course in a listed category, with its chapters in order.
pub async fn get_published_course(
    state: &AppState,
    course_id: Uuid,
) -> AppResult<(CourseRecord, Vec<chapters::Model>)> {
    let (course, category) = state
        .courses()
        .find_one_with::<Categories>(course_id)
        .await?
        .ok_or_else(|| AppError::not_found("Course"))?;
    let category = category.filter(|c| c.is_listed);
    if !course.is_published || category.is_none() {
        return Err(AppError::not_found("Course"));
    }

    let chapters = state.chapters().all_for_course(course_id).await?;
    let instructor = state.users().find_by_id(course.instructor_id).await?;
    Ok((
        CourseRecord {
            course,
            category_name: category.map(|c| c.category_name),
            instructor_name: instructor.map(|u| u.name),
        },
        chapters,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_must_match_media_kind() {
        let body = Bytes::from_static(b"\x89PNG");
        assert!(check_upload(&body, "image/png", "image").is_ok());
        assert!(matches!(
            check_upload(&body, "video/mp4", "image"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            check_upload(&Bytes::new(), "image/png", "image"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn price_must_be_within_bounds() {
        assert!(check_price(0).is_ok());
        assert!(check_price(MAX_PRICE).is_ok());
        assert!(check_price(-1).is_err());
        assert!(check_price(MAX_PRICE + 1).is_err());
        assert!(check_price(i64::MAX).is_err());
    }
}
