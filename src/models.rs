use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{categories, chapters, quizzes::Question, users},
    repository::category_repository,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub category_name: String,
    pub is_listed: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<FixedOffset>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            category_name: model.category_name,
            is_listed: model.is_listed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryCourseCount {
    pub category_id: Uuid,
    pub category_name: String,
    pub course_count: i64,
}

impl From<category_repository::CategoryCourseCount> for CategoryCourseCount {
    fn from(row: category_repository::CategoryCourseCount) -> Self {
        Self {
            category_id: row.category_id,
            category_name: row.category_name,
            course_count: row.course_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DemoVideo {
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Course as returned to clients; media keys are replaced by presigned URLs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub instructor_name: Option<String>,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub level: String,
    pub thumbnail_url: Option<String>,
    pub demo_video: Option<DemoVideo>,
    pub is_published: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Chapter {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub chapter_number: i32,
    pub description: String,
    pub video_url: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<FixedOffset>,
}

impl Chapter {
    pub fn from_entity(model: chapters::Model, video_url: Option<String>) -> Self {
        Self {
            id: model.id,
            course_id: model.course_id,
            title: model.title,
            chapter_number: model.chapter_number,
            description: model.description,
            video_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Quiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub questions: Vec<Question>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<FixedOffset>,
}

/// A question as shown to students, without the answer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentQuestion {
    pub id: Uuid,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<Question> for StudentQuestion {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            options: question.options,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentQuiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub questions: Vec<StudentQuestion>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Certificate {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_title: Option<String>,
    pub download_url: String,
    #[schema(value_type = String, format = DateTime)]
    pub issued_at: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuizResult {
    pub total: usize,
    pub correct: usize,
    pub percentage: u32,
    pub passed: bool,
    pub certificate: Option<Certificate>,
}

