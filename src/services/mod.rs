pub mod auth_service;
pub mod cart_service;
pub mod category_service;
pub mod certificate_service;
pub mod chapter_service;
pub mod course_service;
pub mod quiz_service;
pub mod wishlist_service;
