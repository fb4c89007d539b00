//! Default administrator bootstrap
//!
//! Creates the first admin account when none exists. Used at server start and
//! by the `create-default-admin` binary.

use chrono::Utc;
use herdbook_common::Role;
use sqlx::SqlitePool;

use crate::{
    auth::{hash_password, PasswordError},
    config::DEFAULT_ADMIN_PASSWORD,
    features::shared::error_helpers::is_unique_violation,
};

#[derive(Debug, Clone)]
pub struct BootstrapAdminCommand {
    pub username: String,
    pub password: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapAdminResponse {
    Created { user_id: i64, username: String },
    /// An admin account already exists; nothing was written
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapAdminError {
    #[error("Admin username is required")]
    UsernameRequired,

    #[error("Admin password is required")]
    PasswordRequired,

    #[error("Username '{0}' is already taken by a non-admin account")]
    UsernameTaken(String),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BootstrapAdminCommand {
    pub fn validate(&self) -> Result<(), BootstrapAdminError> {
        if self.username.trim().is_empty() {
            return Err(BootstrapAdminError::UsernameRequired);
        }
        if self.password.is_empty() {
            return Err(BootstrapAdminError::PasswordRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(
    pool: &SqlitePool,
    command: BootstrapAdminCommand,
) -> Result<BootstrapAdminResponse, BootstrapAdminError> {
    command.validate()?;

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE role = ? LIMIT 1")
            .bind(Role::Admin)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        tracing::info!("Admin user already exists, skipping creation");
        return Ok(BootstrapAdminResponse::Skipped);
    }

    let username = command.username.trim().to_string();
    let hash = hash_password(command.password.clone(), command.bcrypt_cost).await?;

    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, password_hash, role, is_active, created_at)
        VALUES (?, ?, ?, 1, ?)
        RETURNING id
        "#,
    )
    .bind(&username)
    .bind(hash)
    .bind(Role::Admin)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            BootstrapAdminError::UsernameTaken(username.clone())
        } else {
            BootstrapAdminError::Database(e)
        }
    })?;

    tracing::info!(user_id, "Default admin created");
    if command.password == DEFAULT_ADMIN_PASSWORD {
        tracing::warn!(
            username = %username,
            "Default admin uses the default password, change it after first login"
        );
    } else {
        tracing::warn!(username = %username, "Change the default admin password after first login");
    }

    Ok(BootstrapAdminResponse::Created { user_id, username })
}
