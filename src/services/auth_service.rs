use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{LoginRequest, RegisterRequest},
    entity::users::{ActiveModel, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{Role, issue_token},
    repository::now,
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<UserModel> {
    let RegisterRequest {
        name,
        email,
        password,
        role,
    } = payload;

    if role == Role::Admin {
        return Err(AppError::BadRequest("Cannot self-register as admin".into()));
    }
    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();
    if name.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A name and a valid email are required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let users = state.users();
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email is already taken".into()));
    }

    let user = users
        .create(ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(hash_password(&password)?),
            role: Set(role.as_str().to_string()),
            created_at: Set(now()),
        })
        .await?;

    audit::record(
        state,
        user.id,
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;
    Ok(user)
}

/// Verify credentials and issue a bearer token.
pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<(String, UserModel)> {
    let LoginRequest { email, password } = payload;
    let user = state
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".into()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let role: Role = user.role.parse()?;
    let token = issue_token(
        user.id,
        role,
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
    )?;

    audit::record(
        state,
        user.id,
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;
    Ok((format!("Bearer {token}"), user))
}
