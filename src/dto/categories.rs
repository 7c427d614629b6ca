use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, CategoryCourseCount};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub category_name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryCourseCountList {
    #[schema(value_type = Vec<CategoryCourseCount>)]
    pub items: Vec<CategoryCourseCount>,
}
