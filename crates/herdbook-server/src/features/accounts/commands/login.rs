//! Username/password login

use herdbook_common::Language;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::{
    auth::{verify_password, PasswordError},
    features::shared::{FieldError, FieldErrors, Validator},
};

/// Login form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginCommand {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Display language chosen on the login page, `en` when absent
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub language: Language,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password verification failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, FromRow)]
struct Credentials {
    id: i64,
    username: String,
    password_hash: String,
    is_active: bool,
}

impl LoginCommand {
    pub fn validate(&self) -> Result<(String, String), LoginError> {
        let mut v = Validator::new();
        let username = v.required_text("username", &self.username, 150);
        if self.password.is_empty() {
            v.add("password", FieldError::Required);
        }
        v.finish((username, self.password.clone()))
            .map_err(LoginError::Validation)
    }

    pub fn language(&self) -> Language {
        Language::from_code_or_default(&self.language)
    }
}

/// Check the credentials of an active user
#[tracing::instrument(skip(pool, command), fields(username = %command.username))]
pub async fn handle(pool: &SqlitePool, command: LoginCommand) -> Result<LoginResponse, LoginError> {
    let (username, password) = command.validate()?;

    let credentials = sqlx::query_as::<_, Credentials>(
        "SELECT id, username, password_hash, is_active FROM users WHERE username = ?",
    )
    .bind(&username)
    .fetch_optional(pool)
    .await?;

    let Some(credentials) = credentials else {
        tracing::info!("Login failed: unknown username");
        return Err(LoginError::InvalidCredentials);
    };

    if !verify_password(password, credentials.password_hash).await? {
        tracing::info!(user_id = credentials.id, "Login failed: wrong password");
        return Err(LoginError::InvalidCredentials);
    }

    if !credentials.is_active {
        tracing::info!(user_id = credentials.id, "Login refused: account inactive");
        return Err(LoginError::InvalidCredentials);
    }

    tracing::info!(user_id = credentials.id, "User logged in");

    Ok(LoginResponse {
        user_id: credentials.id,
        username: credentials.username,
        language: command.language(),
    })
}
