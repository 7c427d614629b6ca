use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Course;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCourseRequest {
    pub course_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<Course>,
    /// Sum of prices over every course in the cart, not just this page.
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistStatus {
    pub course_id: Uuid,
    pub in_wishlist: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Cleared {
    pub removed: u64,
}
