pub mod auth;
pub mod cart;
pub mod categories;
pub mod courses;
pub mod quizzes;
