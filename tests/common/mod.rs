#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use sea_orm::ActiveValue::Set;
use skillzio_api::{
    config::{AppConfig, StorageBackend},
    db::{create_orm_conn, run_migrations},
    dto::courses::{CreateChapterRequest, CreateCourseRequest},
    entity::{categories, courses, users},
    middleware::auth::{AuthUser, Role},
    repository::now,
    services::{category_service, chapter_service, course_service},
    state::AppState,
    storage::MemoryStorage,
};
use uuid::Uuid;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_hours: 1,
        storage_backend: StorageBackend::Memory,
        s3_bucket: None,
        presign_ttl: Duration::from_secs(300),
        max_upload_bytes: 1024 * 1024,
        quiz_pass_percent: 60,
        concurrency_limit: 16,
    }
}

pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
}

/// Fresh in-memory database with the schema applied.
pub async fn setup() -> anyhow::Result<TestApp> {
    let config = test_config();
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let storage = Arc::new(MemoryStorage::new());
    let state = AppState::new(orm, storage.clone(), config);
    Ok(TestApp { state, storage })
}

pub async fn create_user(state: &AppState, role: Role) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    state
        .users()
        .create(users::ActiveModel {
            id: Set(id),
            name: Set(format!("{} {}", role.as_str(), &id.to_string()[..8])),
            email: Set(format!("{id}@example.com")),
            password_hash: Set("not-a-real-hash".to_string()),
            role: Set(role.as_str().to_string()),
            created_at: Set(now()),
        })
        .await?;
    Ok(AuthUser { user_id: id, role })
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<categories::Model> {
    let admin = create_user(state, Role::Admin).await?;
    Ok(category_service::create_category(state, &admin, name).await?)
}

pub async fn create_course(
    state: &AppState,
    instructor: &AuthUser,
    category_id: Uuid,
    title: &str,
    price: i64,
) -> anyhow::Result<courses::Model> {
    Ok(course_service::create_course(
        state,
        instructor,
        CreateCourseRequest {
            title: title.to_string(),
            description: format!("All about {title}"),
            price,
            level: "beginner".to_string(),
            category_id,
        },
    )
    .await?)
}

pub fn chapter(title: &str, chapter_number: i32) -> CreateChapterRequest {
    CreateChapterRequest {
        title: title.to_string(),
        chapter_number,
        description: String::new(),
    }
}

/// A published course with one chapter, owned by a new instructor.
pub async fn published_course(
    state: &AppState,
    category_id: Uuid,
    title: &str,
    price: i64,
) -> anyhow::Result<(AuthUser, courses::Model)> {
    let instructor = create_user(state, Role::Instructor).await?;
    let course = create_course(state, &instructor, category_id, title, price).await?;
    chapter_service::create_chapter(state, &instructor, course.id, chapter("Introduction", 1)).await?;
    let course = course_service::toggle_publish(state, &instructor, course.id).await?;
    Ok((instructor, course))
}
