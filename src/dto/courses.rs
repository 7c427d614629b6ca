use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Chapter, Course};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub level: String,
    pub category_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub level: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CourseList {
    #[schema(value_type = Vec<Course>)]
    pub items: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetail {
    pub course: Course,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateChapterRequest {
    pub title: String,
    pub chapter_number: i32,
    pub description: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateChapterRequest {
    pub title: Option<String>,
    pub chapter_number: Option<i32>,
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ChapterList {
    #[schema(value_type = Vec<Chapter>)]
    pub items: Vec<Chapter>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Deleted {
    pub id: Uuid,
}
