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

#[derive(Debug, Clone)]
pub struct CartContents {
    pub courses: Page<CourseModel>,
    pub total_price: i64,
}

pub async fn add_to_cart(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<CourseModel> {
    ensure_student(user)?;
    let course = available_course(state, course_id).await?;
    let carts = state.carts();
    if carts.contains_course(user.user_id, course_id).await? {
        return Err(AppError::Conflict("Course is already in the cart".into()));
    }
    carts.add_course(user.user_id, course_id).await?;
    Ok(course)
}

/// Removing a course that is not in the cart is not an error.
pub async fn remove_from_cart(state: &AppState, user: &AuthUser, course_id: Uuid) -> AppResult<u64> {
    ensure_student(user)?;
    state.carts().remove_course(user.user_id, course_id).await
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<u64> {
    ensure_student(user)?;
    let removed = state.carts().clear_courses(user.user_id).await?;
    tracing::debug!(student_id = %user.user_id, removed, "cart cleared");
    Ok(removed)
}

pub async fn cart_list(state: &AppState, user: &AuthUser, params: &ListParams) -> AppResult<CartContents> {
    ensure_student(user)?;
    let carts = state.carts();
    let courses = carts.page_courses(user.user_id, params.page, params.limit).await?;
    let total_price = cart_total(&carts.all_courses(user.user_id).await?);
    Ok(CartContents { courses, total_price })
}

/// Sum of course prices, saturating at `i64::MAX`.
pub fn cart_total(courses: &[CourseModel]) -> i64 {
    courses
        .iter()
        .fold(0i64, |total, course| total.saturating_add(course.price))
}
