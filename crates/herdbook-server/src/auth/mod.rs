//! Authentication and access control
//!
//! Passwords are bcrypt hashes; hashing and verification run on the blocking
//! pool. Access control is a plain role check: admin-only views call
//! [`require_admin`] and bounce everyone else to a safe page.

use herdbook_common::Role;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

use crate::error::AppError;

/// Where access-denied redirects land by default
pub const DASHBOARD_PATH: &str = "/dashboard/";

/// Login page, also the target for unauthenticated requests
pub const LOGIN_PATH: &str = "/";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash a password with the configured bcrypt cost
pub async fn hash_password(password: String, cost: u32) -> Result<String, PasswordError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Check a password against a stored hash
///
/// A malformed stored hash counts as a mismatch rather than an error.
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            Ok(false)
        },
    }
}

/// The signed-in user acting on a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Actor {
    #[sqlx(rename = "id")]
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn full_name(&self) -> String {
        crate::models::full_name(&self.first_name, &self.last_name, &self.username)
    }

    /// Load an active user as an actor; inactive or missing users are `None`
    pub async fn load(pool: &SqlitePool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Actor>(
            r#"
            SELECT id, username, role, first_name, last_name
            FROM users
            WHERE id = ? AND is_active = 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}

/// Admin-only gate. Non-admins get "Access denied!" and a redirect to `fallback`.
pub fn require_admin(actor: &Actor, fallback: &'static str) -> Result<(), AppError> {
    if actor.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = actor.user_id, username = %actor.username, "Access denied to admin-only view");
        Err(AppError::AccessDenied {
            redirect_to: fallback,
        })
    }
}

/// Worker profile id of a worker-role actor
///
/// A worker account without a profile is an explicit error rather than a
/// silent empty result.
pub async fn worker_profile_id(pool: &SqlitePool, actor: &Actor) -> Result<i64, AppError> {
    let worker_id: Option<i64> = sqlx::query_scalar("SELECT id FROM workers WHERE user_id = ?")
        .bind(actor.user_id)
        .fetch_optional(pool)
        .await?;

    worker_id.ok_or(AppError::WorkerProfileMissing {
        user_id: actor.user_id,
    })
}
