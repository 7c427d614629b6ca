use uuid::Uuid;

use crate::{
    entity::courses::Model as CourseModel,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_student},
    repository::Page,
    routes::params::ListParams,
    services::course_service::available_course,
    state::AppState,
};

pub async fn add_to_wishlist(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<CourseModel> {
    ensure_student(user)?;
    let course = available_course(state, course_id).await?;
    let wishlists = state.wishlists();
    if wishlists.contains_course(user.user_id, course_id).await? {
        return Err(AppError::Conflict("Course is already in the wishlist".into()));
    }
    wishlists.add_course(user.user_id, course_id).await?;
    Ok(course)
}

pub async fn remove_from_wishlist(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<u64> {
    ensure_student(user)?;
    state.wishlists().remove_course(user.user_id, course_id).await
}

pub async fn is_in_wishlist(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<bool> {
    ensure_student(user)?;
    state.wishlists().contains_course(user.user_id, course_id).await
}

pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
    params: &ListParams,
) -> AppResult<Page<CourseModel>> {
    ensure_student(user)?;
    state
        .wishlists()
        .page_courses(user.user_id, params.page, params.limit)
        .await
}
