use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryCourseCountList, CategoryList, CategoryRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(list_categories).post(create_category),
        )
        .route("/categories/course-counts", get(course_counts))
        .route("/categories/{id}", put(update_category))
        .route("/categories/{id}/toggle-listing", patch(toggle_listing))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(ListQuery),
    responses(
        (status = 200, description = "Listed and unlisted categories", body = ApiResponse<CategoryList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    ensure_admin(&user)?;
    let params = query.normalize();
    let page = category_service::list_categories(&state, &user, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = CategoryList {
        items: page.data.into_iter().map(Category::from).collect(),
    };
    Ok(Json(ApiResponse::success("Categories", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Invalid name"),
        (status = 409, description = "Category name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = category_service::create_category(&state, &user, &payload.category_name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Category created", category.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Category name already exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = category_service::update_category(&state, &user, id, &payload.category_name).await?;
    Ok(Json(ApiResponse::ok("Category updated", category.into())))
}

#[utoipa::path(
    patch,
    path = "/api/admin/categories/{id}/toggle-listing",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Listing flag flipped", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn toggle_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = category_service::toggle_listing(&state, &user, id).await?;
    let message = if category.is_listed {
        "Category listed"
    } else {
        "Category unlisted"
    };
    Ok(Json(ApiResponse::ok(message, category.into())))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories/course-counts",
    responses(
        (status = 200, description = "Number of courses per category", body = ApiResponse<CategoryCourseCountList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn course_counts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CategoryCourseCountList>>> {
    let rows = category_service::course_counts(&state, &user).await?;
    let data = CategoryCourseCountList {
        items: rows.into_iter().map(Into::into).collect(),
    };
    Ok(Json(ApiResponse::ok("Course counts", data)))
}
