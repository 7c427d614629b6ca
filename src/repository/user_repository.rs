use std::collections::HashMap;

use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use crate::{
    entity::{
        Users,
        users::{Column, Model},
    },
    error::AppResult,
};

use super::Repository;

pub type UserRepository<'db> = Repository<'db, Users>;

impl UserRepository<'_> {
    /// Emails are stored lowercased, so the lookup key is folded the same way.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<Model>> {
        self.find_one(Condition::all().add(Column::Email.eq(email.trim().to_lowercase())))
            .await
    }

    /// Display names for a batch of user ids; unknown ids are omitted.
    pub async fn names_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self
            .find_all(Condition::all().add(Column::Id.is_in(ids.iter().copied())), None)
            .await?;
        Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
    }
}
