use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddCourseRequest, CartView, Cleared, WishlistStatus},
        categories::{CategoryCourseCountList, CategoryList, CategoryRequest},
        courses::{
            ChapterList, CourseDetail, CourseList, CreateChapterRequest, CreateCourseRequest,
            Deleted, UpdateChapterRequest, UpdateCourseRequest,
        },
        quizzes::{
            AnswerInput, CertificateList, CreateQuizRequest, QuestionInput, QuestionPage,
            SubmitQuizRequest, UpdateQuestionRequest,
        },
    },
    entity::quizzes::Question,
    middleware::auth::Role,
    models::{
        Category, CategoryCourseCount, Certificate, Chapter, Course, DemoVideo, Quiz, QuizResult,
        StudentQuestion, StudentQuiz, User,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, health, instructor, params, student},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        admin::list_categories,
        admin::create_category,
        admin::update_category,
        admin::toggle_listing,
        admin::course_counts,
        instructor::list_categories,
        instructor::list_courses,
        instructor::create_course,
        instructor::get_course,
        instructor::update_course,
        instructor::delete_course,
        instructor::toggle_publish,
        instructor::upload_thumbnail,
        instructor::upload_demo_video,
        instructor::list_chapters,
        instructor::create_chapter,
        instructor::get_chapter,
        instructor::update_chapter,
        instructor::delete_chapter,
        instructor::upload_chapter_video,
        instructor::create_quiz,
        instructor::get_quiz,
        instructor::delete_quiz,
        instructor::list_questions,
        instructor::add_question,
        instructor::update_question,
        instructor::remove_question,
        student::list_categories,
        student::list_courses,
        student::get_course,
        student::get_quiz,
        student::submit_quiz,
        student::cart_list,
        student::add_to_cart,
        student::remove_from_cart,
        student::clear_cart,
        student::wishlist_list,
        student::add_to_wishlist,
        student::remove_from_wishlist,
        student::wishlist_exists,
        student::list_certificates
    ),
    components(
        schemas(
            Role,
            User,
            Category,
            CategoryCourseCount,
            Course,
            DemoVideo,
            Chapter,
            Question,
            Quiz,
            StudentQuestion,
            StudentQuiz,
            Certificate,
            QuizResult,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CategoryRequest,
            CategoryList,
            CategoryCourseCountList,
            CreateCourseRequest,
            UpdateCourseRequest,
            CourseList,
            CourseDetail,
            CreateChapterRequest,
            UpdateChapterRequest,
            ChapterList,
            Deleted,
            CreateQuizRequest,
            QuestionInput,
            UpdateQuestionRequest,
            QuestionPage,
            AnswerInput,
            SubmitQuizRequest,
            CertificateList,
            AddCourseRequest,
            CartView,
            WishlistStatus,
            Cleared,
            params::ListQuery,
            params::CourseQuery,
            health::HealthData,
            Meta,
            ApiResponse<Category>,
            ApiResponse<CategoryList>,
            ApiResponse<Course>,
            ApiResponse<CourseList>,
            ApiResponse<Chapter>,
            ApiResponse<ChapterList>,
            ApiResponse<Quiz>,
            ApiResponse<QuizResult>,
            ApiResponse<CartView>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Admin", description = "Category moderation"),
        (name = "Instructor", description = "Course, chapter and quiz authoring"),
        (name = "Student", description = "Browsing, cart, wishlist, quizzes and certificates"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
