//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use herdbook_common::Message;
use thiserror::Error;

use crate::{
    api::response::ErrorResponse,
    auth::{PasswordError, LOGIN_PATH},
    session::{Flash, PendingFlashes, SessionChange, SessionError},
};

/// Result type alias for handler operations
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// Validation failures are not errors at this level: handlers re-render the
/// form instead. Everything here ends the request.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    AccessDenied { redirect_to: &'static str },

    #[error("Worker profile not found for user {user_id}")]
    WorkerProfileMissing { user_id: i64 },

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(resource_type: &str, id: i64) -> Self {
        Self::NotFound(format!("{} {} not found", resource_type, id))
    }
}

fn flash_redirect(location: &str, flash: Flash) -> Response {
    (Extension(PendingFlashes(vec![flash])), Redirect::to(location)).into_response()
}

fn internal_error() -> Response {
    let error = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                internal_error()
            },
            AppError::NotFound(ref message) => {
                let error = ErrorResponse::new("NOT_FOUND", message.clone());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            AppError::Unauthenticated => {
                flash_redirect(LOGIN_PATH, Flash::error(Message::LoginRequired))
            },
            AppError::AccessDenied { redirect_to } => {
                flash_redirect(redirect_to, Flash::error(Message::AccessDenied))
            },
            AppError::WorkerProfileMissing { user_id } => {
                tracing::warn!(user_id, "Worker account has no worker profile, logging out");
                (
                    Extension(SessionChange::Logout),
                    flash_redirect(LOGIN_PATH, Flash::error(Message::WorkerProfileMissing)),
                )
                    .into_response()
            },
            AppError::Session(ref e) => {
                tracing::error!("Session error: {:?}", e);
                internal_error()
            },
            AppError::Password(ref e) => {
                tracing::error!("Password hashing error: {:?}", e);
                internal_error()
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                internal_error()
            },
        }
    }
}
