use bytes::Bytes;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    dto::courses::{CreateChapterRequest, UpdateChapterRequest},
    entity::chapters::{ActiveModel, Model as ChapterModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    repository::{ChapterRepository, Page, now},
    routes::params::ListParams,
    services::course_service::{check_upload, owned_course},
    state::AppState,
};

/// Which uniqueness axes a candidate chapter collides on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterConflict {
    pub title: bool,
    pub number: bool,
}

impl ChapterConflict {
    pub fn any(&self) -> bool {
        self.title || self.number
    }

    pub fn message(&self) -> &'static str {
        match (self.title, self.number) {
            (true, true) => "A chapter with this title and chapter number already exists",
            (true, false) => "A chapter with this title already exists",
            (false, true) => "A chapter with this chapter number already exists",
            (false, false) => "",
        }
    }
}

pub async fn find_conflict(
    repo: &ChapterRepository<'_>,
    course_id: Uuid,
    title: &str,
    chapter_number: i32,
    exclude: Option<Uuid>,
) -> AppResult<ChapterConflict> {
    let title_key = title.trim().to_lowercase();
    let siblings = repo.siblings(course_id, exclude).await?;

    Ok(siblings
        .iter()
        .fold(ChapterConflict::default(), |acc, chapter| ChapterConflict {
            title: acc.title || chapter.title.trim().to_lowercase() == title_key,
            number: acc.number || chapter.chapter_number == chapter_number,
        }))
}

fn validate(title: &str, chapter_number: i32) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Chapter title is required".into()));
    }
    if chapter_number < 1 {
        return Err(AppError::BadRequest("Chapter number must be positive".into()));
    }
    Ok(title.to_string())
}

pub async fn create_chapter(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    payload: CreateChapterRequest,
) -> AppResult<ChapterModel> {
    owned_course(state, user, course_id).await?;
    let title = validate(&payload.title, payload.chapter_number)?;

    let repo = state.chapters();
    let conflict = find_conflict(&repo, course_id, &title, payload.chapter_number, None).await?;
    if conflict.any() {
        return Err(AppError::Conflict(conflict.message().into()));
    }

    let created_at = now();
    repo.create(ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course_id),
        title: Set(title),
        chapter_number: Set(payload.chapter_number),
        description: Set(payload.description.trim().to_string()),
        video_key: Set(None),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    })
    .await
}

pub async fn list_chapters(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    params: &ListParams,
) -> AppResult<Page<ChapterModel>> {
    owned_course(state, user, course_id).await?;
    state
        .chapters()
        .list_for_course(course_id, &params.search, params.page, params.limit)
        .await
}

pub async fn get_chapter(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    chapter_id: Uuid,
) -> AppResult<ChapterModel> {
    owned_course(state, user, course_id).await?;
    state
        .chapters()
        .find_in_course(course_id, chapter_id)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter"))
}

pub async fn update_chapter(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    chapter_id: Uuid,
    payload: UpdateChapterRequest,
) -> AppResult<ChapterModel> {
    let current = get_chapter(state, user, course_id, chapter_id).await?;
    let chapter_number = payload.chapter_number.unwrap_or(current.chapter_number);
    let title = validate(payload.title.as_deref().unwrap_or(&current.title), chapter_number)?;

    let repo = state.chapters();
    let conflict = find_conflict(&repo, course_id, &title, chapter_number, Some(chapter_id)).await?;
    if conflict.any() {
        return Err(AppError::Conflict(conflict.message().into()));
    }

    let mut patch = ActiveModel {
        title: Set(title),
        chapter_number: Set(chapter_number),
        updated_at: Set(now()),
        ..Default::default()
    };
    if let Some(description) = payload.description {
        patch.description = Set(description.trim().to_string());
    }
    repo.update(chapter_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter"))
}

pub async fn delete_chapter(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    chapter_id: Uuid,
) -> AppResult<ChapterModel> {
    get_chapter(state, user, course_id, chapter_id).await?;
    state
        .chapters()
        .delete(chapter_id)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter"))
}

pub async fn upload_chapter_video(
    state: &AppState,
    user: &AuthUser,
    course_id: Uuid,
    chapter_id: Uuid,
    content_type: &str,
    body: Bytes,
) -> AppResult<ChapterModel> {
    get_chapter(state, user, course_id, chapter_id).await?;
    check_upload(&body, content_type, "video")?;

    let key = state
        .storage
        .upload(body, content_type, &format!("courses/{course_id}/chapters/{chapter_id}"))
        .await?;
    let patch = ActiveModel {
        video_key: Set(Some(key)),
        updated_at: Set(now()),
        ..Default::default()
    };
    state
        .chapters()
        .update(chapter_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_the_axis() {
        let title = ChapterConflict { title: true, number: false };
        let number = ChapterConflict { title: false, number: true };
        assert!(title.message().contains("title"));
        assert!(!title.message().contains("number"));
        assert!(number.message().contains("number"));
        assert!(!ChapterConflict::default().any());
    }
}
