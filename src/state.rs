use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    repository::{
        CartRepository, CategoryRepository, CertificateRepository, ChapterRepository,
        CourseRepository, QuizRepository, Repository, UserRepository, WishlistRepository,
    },
    storage::ObjectStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub storage: Arc<dyn ObjectStorage>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, storage: Arc<dyn ObjectStorage>, config: AppConfig) -> Self {
        Self {
            orm,
            storage,
            config: Arc::new(config),
        }
    }

    pub fn users(&self) -> UserRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn categories(&self) -> CategoryRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn courses(&self) -> CourseRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn chapters(&self) -> ChapterRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn quizzes(&self) -> QuizRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn carts(&self) -> CartRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn wishlists(&self) -> WishlistRepository<'_> {
        Repository::new(&self.orm)
    }

    pub fn certificates(&self) -> CertificateRepository<'_> {
        Repository::new(&self.orm)
    }

    /// Presigned URL for an optional storage key, using the configured TTL.
    pub async fn presign(&self, key: Option<&str>) -> crate::error::AppResult<Option<String>> {
        match key {
            Some(key) => Ok(Some(self.storage.presign(key, self.config.presign_ttl).await?)),
            None => Ok(None),
        }
    }
}
