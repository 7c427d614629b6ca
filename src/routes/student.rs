use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::{AddCourseRequest, CartView, Cleared, WishlistStatus},
        categories::CategoryList,
        courses::{CourseDetail, CourseList},
        quizzes::{CertificateList, SubmitQuizRequest},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_student},
    models::{Category, Course, QuizResult, StudentQuiz},
    response::{ApiResponse, Meta},
    routes::{
        params::{CourseQuery, ListQuery},
        views,
    },
    services::{cart_service, category_service, certificate_service, course_service, quiz_service, wishlist_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(get_course))
        .route("/courses/{id}/quiz", get(get_quiz))
        .route("/courses/{id}/quiz/submit", post(submit_quiz))
        .route("/cart", get(cart_list).post(add_to_cart).delete(clear_cart))
        .route("/cart/{course_id}", delete(remove_from_cart))
        .route("/wishlist", get(wishlist_list).post(add_to_wishlist))
        .route("/wishlist/{course_id}", delete(remove_from_wishlist))
        .route("/wishlist/{course_id}/exists", get(wishlist_exists))
        .route("/certificates", get(list_certificates))
}

#[utoipa::path(
    get,
    path = "/api/student/categories",
    params(ListQuery),
    responses(
        (status = 200, description = "Listed categories", body = ApiResponse<CategoryList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    ensure_student(&user)?;
    let params = query.normalize();
    let page = category_service::list_categories(&state, &user, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = CategoryList {
        items: page.data.into_iter().map(Category::from).collect(),
    };
    Ok(Json(ApiResponse::success("Categories", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/student/courses",
    params(CourseQuery),
    responses(
        (status = 200, description = "Published courses in listed categories", body = ApiResponse<CourseList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CourseQuery>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    ensure_student(&user)?;
    let (params, category_id) = query.normalize();
    let page = course_service::list_published_courses(&state, &params, category_id).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = CourseList {
        items: views::courses(&state, page.data).await?,
    };
    Ok(Json(ApiResponse::success("Courses", data, Some(meta))))
}

#[utoipa::path(
    get,
    path = "/api/student/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with its chapters", body = ApiResponse<CourseDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn get_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CourseDetail>>> {
    ensure_student(&user)?;
    let (record, chapters) = course_service::get_published_course(&state, id).await?;
    let data = CourseDetail {
        course: views::course(&state, record).await?,
        chapters: views::chapters(&state, chapters).await?,
    };
    Ok(Json(ApiResponse::ok("Course", data)))
}

#[utoipa::path(
    get,
    path = "/api/student/courses/{id}/quiz",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Quiz without answers", body = ApiResponse<StudentQuiz>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn get_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StudentQuiz>>> {
    let quiz = quiz_service::student_quiz(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok("Quiz", views::student_quiz(quiz))))
}

#[utoipa::path(
    post,
    path = "/api/student/courses/{id}/quiz/submit",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Score, plus a certificate when passed", body = ApiResponse<QuizResult>),
        (status = 400, description = "Quiz has no questions"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn submit_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> AppResult<Json<ApiResponse<QuizResult>>> {
    let outcome = quiz_service::submit_quiz(&state, &user, id, &payload.answers).await?;
    let certificate = match outcome.certificate {
        Some(certificate) => Some(views::certificate(&state, certificate, None).await?),
        None => None,
    };
    let message = if outcome.passed {
        "Quiz passed"
    } else {
        "Quiz not passed"
    };
    let data = QuizResult {
        total: outcome.total,
        correct: outcome.correct,
        percentage: outcome.percentage,
        passed: outcome.passed,
        certificate,
    };
    Ok(Json(ApiResponse::ok(message, data)))
}

#[utoipa::path(
    get,
    path = "/api/student/cart",
    params(ListQuery),
    responses(
        (status = 200, description = "Cart courses and total price", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let params = query.normalize();
    let contents = cart_service::cart_list(&state, &user, &params).await?;
    let meta = Meta::paged(params.page, params.limit, contents.courses.total);
    let data = CartView {
        items: views::bare_courses(&state, contents.courses.data).await?,
        total_price: contents.total_price,
    };
    Ok(Json(ApiResponse::success("Cart", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/student/cart",
    request_body = AddCourseRequest,
    responses(
        (status = 201, description = "Course added to cart", body = ApiResponse<Course>),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Already in cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddCourseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let course = cart_service::add_to_cart(&state, &user, payload.course_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Added to cart",
            views::bare_course(&state, course).await?,
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/student/cart/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course removed from cart (no-op when absent)", body = ApiResponse<Cleared>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Cleared>>> {
    let removed = cart_service::remove_from_cart(&state, &user, course_id).await?;
    Ok(Json(ApiResponse::ok("Removed from cart", Cleared { removed })))
}

#[utoipa::path(
    delete,
    path = "/api/student/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<Cleared>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Cleared>>> {
    let removed = cart_service::clear_cart(&state, &user).await?;
    Ok(Json(ApiResponse::ok("Cart cleared", Cleared { removed })))
}

#[utoipa::path(
    get,
    path = "/api/student/wishlist",
    params(ListQuery),
    responses(
        (status = 200, description = "Wishlisted courses", body = ApiResponse<CourseList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn wishlist_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    let params = query.normalize();
    let page = wishlist_service::list_wishlist(&state, &user, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = CourseList {
        items: views::bare_courses(&state, page.data).await?,
    };
    Ok(Json(ApiResponse::success("Wishlist", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/student/wishlist",
    request_body = AddCourseRequest,
    responses(
        (status = 201, description = "Course added to wishlist", body = ApiResponse<Course>),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Already in wishlist"),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddCourseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let course = wishlist_service::add_to_wishlist(&state, &user, payload.course_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Added to wishlist",
            views::bare_course(&state, course).await?,
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/student/wishlist/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course removed from wishlist (no-op when absent)", body = ApiResponse<Cleared>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Cleared>>> {
    let removed = wishlist_service::remove_from_wishlist(&state, &user, course_id).await?;
    Ok(Json(ApiResponse::ok("Removed from wishlist", Cleared { removed })))
}

#[utoipa::path(
    get,
    path = "/api/student/wishlist/{course_id}/exists",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Whether the course is wishlisted", body = ApiResponse<WishlistStatus>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn wishlist_exists(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<WishlistStatus>>> {
    let in_wishlist = wishlist_service::is_in_wishlist(&state, &user, course_id).await?;
    Ok(Json(ApiResponse::ok(
        "Wishlist status",
        WishlistStatus {
            course_id,
            in_wishlist,
        },
    )))
}

#[utoipa::path(
    get,
    path = "/api/student/certificates",
    params(ListQuery),
    responses(
        (status = 200, description = "Issued certificates with download links", body = ApiResponse<CertificateList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn list_certificates(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CertificateList>>> {
    let params = query.normalize();
    let page = certificate_service::list_certificates(&state, &user, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);

    let mut items = Vec::with_capacity(page.data.len());
    for (certificate, course) in page.data {
        let course_title = course.map(|c| c.title);
        items.push(views::certificate(&state, certificate, course_title).await?);
    }
    Ok(Json(ApiResponse::success(
        "Certificates",
        CertificateList { items },
        Some(meta),
    )))
}
