use sea_orm::ActiveValue::{NotSet, Set};
use uuid::Uuid;

use crate::{
    audit,
    entity::categories::{ActiveModel, Model as CategoryModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Role, ensure_admin},
    repository::{Page, category_repository::{CategoryCourseCount, name_key}, now},
    routes::params::ListParams,
    state::AppState,
};

const MAX_NAME_LEN: usize = 60;

/// Which categories a caller may browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    All,
    ListedOnly,
}

impl CategoryScope {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => CategoryScope::All,
            Role::Instructor | Role::Student => CategoryScope::ListedOnly,
        }
    }
}

fn clean_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Category name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

async fn ensure_name_free(state: &AppState, name: &str, exclude: Option<Uuid>) -> AppResult<()> {
    if let Some(existing) = state.categories().find_name_conflict(name, exclude).await? {
        return Err(AppError::Conflict(format!(
            "Category '{}' already exists",
            existing.category_name
        )));
    }
    Ok(())
}

pub async fn list_categories(
    state: &AppState,
    user: &AuthUser,
    params: &ListParams,
) -> AppResult<Page<CategoryModel>> {
    let listed_only = CategoryScope::for_role(user.role) == CategoryScope::ListedOnly;
    state
        .categories()
        .search(&params.search, listed_only, params.page, params.limit)
        .await
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    category_name: &str,
) -> AppResult<CategoryModel> {
    ensure_admin(user)?;
    let name = clean_name(category_name)?;
    ensure_name_free(state, &name, None).await?;

    let created_at = now();
    let category = state
        .categories()
        .create(ActiveModel {
            id: Set(Uuid::new_v4()),
            name_key: Set(name_key(&name)),
            category_name: Set(name),
            is_listed: Set(true),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        })
        .await?;

    audit::record(
        state,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;
    Ok(category)
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    category_name: &str,
) -> AppResult<CategoryModel> {
    ensure_admin(user)?;
    let name = clean_name(category_name)?;
    ensure_name_free(state, &name, Some(id)).await?;

    let patch = ActiveModel {
        id: NotSet,
        name_key: Set(name_key(&name)),
        category_name: Set(name),
        is_listed: NotSet,
        created_at: NotSet,
        updated_at: Set(now()),
    };
    state
        .categories()
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))
}

/// Flip `is_listed`. Two calls restore the original state.
pub async fn toggle_listing(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<CategoryModel> {
    ensure_admin(user)?;
    let repo = state.categories();
    let current = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    let patch = ActiveModel {
        is_listed: Set(!current.is_listed),
        updated_at: Set(now()),
        ..Default::default()
    };
    let updated = repo
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    audit::record(
        state,
        user.user_id,
        if updated.is_listed { "category_list" } else { "category_unlist" },
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;
    Ok(updated)
}

pub async fn course_counts(state: &AppState, user: &AuthUser) -> AppResult<Vec<CategoryCourseCount>> {
    ensure_admin(user)?;
    state.categories().course_counts().await
}

pub async fn find_category_by_name(state: &AppState, name: &str) -> AppResult<Option<CategoryModel>> {
    state.categories().find_category_by_name(name).await
}
