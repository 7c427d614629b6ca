use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        categories::CategoryList,
        courses::{
            ChapterList, CourseList, CreateChapterRequest, CreateCourseRequest, Deleted,
            UpdateChapterRequest, UpdateCourseRequest,
        },
        quizzes::{CreateQuizRequest, QuestionInput, QuestionPage, UpdateQuestionRequest},
    },
    entity::quizzes::Question,
    error::AppResult,
    middleware::auth::{AuthUser, ensure_instructor},
    models::{Category, Chapter, Course, Quiz},
    response::{ApiResponse, Meta},
    routes::{params::ListQuery, views},
    services::{category_service, chapter_service, course_service, quiz_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{id}/publish", patch(toggle_publish))
        .route("/courses/{id}/thumbnail", put(upload_thumbnail))
        .route("/courses/{id}/demo-video", put(upload_demo_video))
        .route(
            "/courses/{id}/chapters",
            get(list_chapters).post(create_chapter),
        )
        .route(
            "/courses/{id}/chapters/{chapter_id}",
            get(get_chapter).put(update_chapter).delete(delete_chapter),
        )
        .route(
            "/courses/{id}/chapters/{chapter_id}/video",
            put(upload_chapter_video),
        )
        .route(
            "/courses/{id}/quiz",
            get(get_quiz).post(create_quiz).delete(delete_quiz),
        )
        .route(
            "/courses/{id}/quiz/questions",
            get(list_questions).post(add_question),
        )
        .route(
            "/courses/{id}/quiz/questions/{question_id}",
            put(update_question).delete(remove_question),
        )
}

/// Media type of an upload body, without parameters.
fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

#[utoipa::path(
    get,
    path = "/api/instructor/categories",
    params(ListQuery),
    responses(
        (status = 200, description = "Listed categories", body = ApiResponse<CategoryList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    ensure_instructor(&user)?;
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
    path = "/api/instructor/courses",
    params(ListQuery),
    responses(
        (status = 200, description = "Courses owned by the caller", body = ApiResponse<CourseList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CourseList>>> {
    let params = query.normalize();
    let page = course_service::list_instructor_courses(&state, &user, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = CourseList {
        items: views::courses(&state, page.data).await?,
    };
    Ok(Json(ApiResponse::success("Courses", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/instructor/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<Course>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let course = course_service::create_course(&state, &user, payload).await?;
    let course = views::bare_course(&state, course).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Course created", course))))
}

#[utoipa::path(
    get,
    path = "/api/instructor/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = ApiResponse<Course>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn get_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let record = course_service::get_instructor_course(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok("Course", views::course(&state, record).await?)))
}

#[utoipa::path(
    put,
    path = "/api/instructor/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<Course>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let course = course_service::update_course(&state, &user, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        "Course updated",
        views::bare_course(&state, course).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/instructor/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = ApiResponse<Deleted>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let course = course_service::delete_course(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok("Course deleted", Deleted { id: course.id })))
}

#[utoipa::path(
    patch,
    path = "/api/instructor/courses/{id}/publish",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Publish flag flipped", body = ApiResponse<Course>),
        (status = 400, description = "Course has no chapters"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn toggle_publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Course>>> {
    let course = course_service::toggle_publish(&state, &user, id).await?;
    let message = if course.is_published {
        "Course published"
    } else {
        "Course unpublished"
    };
    Ok(Json(ApiResponse::ok(message, views::bare_course(&state, course).await?)))
}

#[utoipa::path(
    put,
    path = "/api/instructor/courses/{id}/thumbnail",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body(content = Vec<u8>, description = "Raw image bytes", content_type = "image/png"),
    responses(
        (status = 200, description = "Thumbnail stored", body = ApiResponse<Course>),
        (status = 400, description = "Missing or non-image body"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<Course>>> {
    let course =
        course_service::upload_thumbnail(&state, &user, id, &content_type(&headers), body).await?;
    Ok(Json(ApiResponse::ok(
        "Thumbnail uploaded",
        views::bare_course(&state, course).await?,
    )))
}

#[utoipa::path(
    put,
    path = "/api/instructor/courses/{id}/demo-video",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body(content = Vec<u8>, description = "Raw video bytes", content_type = "video/mp4"),
    responses(
        (status = 200, description = "Demo video stored", body = ApiResponse<Course>),
        (status = 400, description = "Missing or non-video body"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn upload_demo_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<Course>>> {
    let course =
        course_service::upload_demo_video(&state, &user, id, &content_type(&headers), body).await?;
    Ok(Json(ApiResponse::ok(
        "Demo video uploaded",
        views::bare_course(&state, course).await?,
    )))
}

#[utoipa::path(
    get,
    path = "/api/instructor/courses/{id}/chapters",
    params(("id" = Uuid, Path, description = "Course ID"), ListQuery),
    responses(
        (status = 200, description = "Chapters ordered by number", body = ApiResponse<ChapterList>),
        (status = 404, description = "Course not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn list_chapters(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<ChapterList>>> {
    let params = query.normalize();
    let page = chapter_service::list_chapters(&state, &user, id, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = ChapterList {
        items: views::chapters(&state, page.data).await?,
    };
    Ok(Json(ApiResponse::success("Chapters", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/instructor/courses/{id}/chapters",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateChapterRequest,
    responses(
        (status = 201, description = "Chapter created", body = ApiResponse<Chapter>),
        (status = 409, description = "Title or number already used in this course"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn create_chapter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateChapterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Chapter>>)> {
    let chapter = chapter_service::create_chapter(&state, &user, id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Chapter created",
            views::chapter(&state, chapter).await?,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/instructor/courses/{id}/chapters/{chapter_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("chapter_id" = Uuid, Path, description = "Chapter ID")
    ),
    responses(
        (status = 200, description = "Chapter", body = ApiResponse<Chapter>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn get_chapter(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, chapter_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Chapter>>> {
    let chapter = chapter_service::get_chapter(&state, &user, id, chapter_id).await?;
    Ok(Json(ApiResponse::ok("Chapter", views::chapter(&state, chapter).await?)))
}

#[utoipa::path(
    put,
    path = "/api/instructor/courses/{id}/chapters/{chapter_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("chapter_id" = Uuid, Path, description = "Chapter ID")
    ),
    request_body = UpdateChapterRequest,
    responses(
        (status = 200, description = "Chapter updated", body = ApiResponse<Chapter>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Title or number already used in this course"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn update_chapter(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, chapter_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateChapterRequest>,
) -> AppResult<Json<ApiResponse<Chapter>>> {
    let chapter = chapter_service::update_chapter(&state, &user, id, chapter_id, payload).await?;
    Ok(Json(ApiResponse::ok(
        "Chapter updated",
        views::chapter(&state, chapter).await?,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/instructor/courses/{id}/chapters/{chapter_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("chapter_id" = Uuid, Path, description = "Chapter ID")
    ),
    responses(
        (status = 200, description = "Chapter deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn delete_chapter(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, chapter_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let chapter = chapter_service::delete_chapter(&state, &user, id, chapter_id).await?;
    Ok(Json(ApiResponse::ok("Chapter deleted", Deleted { id: chapter.id })))
}

#[utoipa::path(
    put,
    path = "/api/instructor/courses/{id}/chapters/{chapter_id}/video",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("chapter_id" = Uuid, Path, description = "Chapter ID")
    ),
    request_body(content = Vec<u8>, description = "Raw video bytes", content_type = "video/mp4"),
    responses(
        (status = 200, description = "Chapter video stored", body = ApiResponse<Chapter>),
        (status = 400, description = "Missing or non-video body"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn upload_chapter_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, chapter_id)): Path<(Uuid, Uuid)>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ApiResponse<Chapter>>> {
    let chapter = chapter_service::upload_chapter_video(
        &state,
        &user,
        id,
        chapter_id,
        &content_type(&headers),
        body,
    )
    .await?;
    Ok(Json(ApiResponse::ok(
        "Chapter video uploaded",
        views::chapter(&state, chapter).await?,
    )))
}

#[utoipa::path(
    post,
    path = "/api/instructor/courses/{id}/quiz",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = ApiResponse<Quiz>),
        (status = 409, description = "Course already has a quiz or duplicate questions"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn create_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateQuizRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Quiz>>)> {
    let quiz = quiz_service::create_quiz(&state, &user, id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Quiz created", views::quiz(quiz))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/instructor/courses/{id}/quiz",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Quiz with answers", body = ApiResponse<Quiz>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn get_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Quiz>>> {
    let quiz = quiz_service::get_quiz(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok("Quiz", views::quiz(quiz))))
}

#[utoipa::path(
    delete,
    path = "/api/instructor/courses/{id}/quiz",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Quiz deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn delete_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let quiz = quiz_service::delete_quiz(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok("Quiz deleted", Deleted { id: quiz.id })))
}

#[utoipa::path(
    get,
    path = "/api/instructor/courses/{id}/quiz/questions",
    params(("id" = Uuid, Path, description = "Course ID"), ListQuery),
    responses(
        (status = 200, description = "Quiz questions", body = ApiResponse<QuestionPage>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn list_questions(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<QuestionPage>>> {
    let params = query.normalize();
    let page = quiz_service::list_questions(&state, &user, id, &params).await?;
    let meta = Meta::paged(params.page, params.limit, page.total);
    let data = QuestionPage { items: page.data };
    Ok(Json(ApiResponse::success("Questions", data, Some(meta))))
}

#[utoipa::path(
    post,
    path = "/api/instructor/courses/{id}/quiz/questions",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = QuestionInput,
    responses(
        (status = 201, description = "Question added", body = ApiResponse<Question>),
        (status = 409, description = "Duplicate question or concurrent edit"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn add_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Question>>)> {
    let question = quiz_service::add_question(&state, &user, id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Question added", question)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/instructor/courses/{id}/quiz/questions/{question_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    request_body = UpdateQuestionRequest,
    responses(
        (status = 200, description = "Question updated", body = ApiResponse<Question>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate question or concurrent edit"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn update_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> AppResult<Json<ApiResponse<Question>>> {
    let question = quiz_service::update_question(&state, &user, id, question_id, payload).await?;
    Ok(Json(ApiResponse::ok("Question updated", question)))
}

#[utoipa::path(
    delete,
    path = "/api/instructor/courses/{id}/quiz/questions/{question_id}",
    params(
        ("id" = Uuid, Path, description = "Course ID"),
        ("question_id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "Question removed", body = ApiResponse<Question>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Instructor"
)]
pub async fn remove_question(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Question>>> {
    let question = quiz_service::remove_question(&state, &user, id, question_id).await?;
    Ok(Json(ApiResponse::ok("Question removed", question)))
}
