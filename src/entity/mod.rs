pub mod audit_logs;
pub mod cart_items;
pub mod categories;
pub mod certificates;
pub mod chapters;
pub mod courses;
pub mod quizzes;
pub mod users;
pub mod wishlist_items;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use certificates::Entity as Certificates;
pub use chapters::Entity as Chapters;
pub use courses::Entity as Courses;
pub use quizzes::Entity as Quizzes;
pub use users::Entity as Users;
pub use wishlist_items::Entity as WishlistItems;
