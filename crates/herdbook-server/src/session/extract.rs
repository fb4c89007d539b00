//! Per-request context extractors

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use herdbook_common::Language;

use super::Flash;
use crate::{auth::Actor, error::AppError};

/// Language, signed-in user and pending flashes of the current request
///
/// Inserted by the session layer; every handler receives it explicitly.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub language: Language,
    pub actor: Option<Actor>,
    pub messages: Vec<Flash>,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal("request context missing, session layer not installed".to_string()))
    }
}

/// A request from a signed-in user. Anonymous requests are redirected to login.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub actor: Actor,
    pub request: RequestContext,
}

impl AuthContext {
    pub fn language(&self) -> Language {
        self.request.language
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request = RequestContext::from_request_parts(parts, state).await?;
        let actor = request.actor.clone().ok_or(AppError::Unauthenticated)?;
        Ok(Self { actor, request })
    }
}
