pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{config::Config, db, features, middleware, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub sessions: SessionStore,
    /// bcrypt work factor for new passwords
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        let sessions = SessionStore::new(
            db.clone(),
            config.session.ttl_hours,
            config.session.cookie_secure,
        );
        Self {
            db,
            sessions,
            bcrypt_cost: config.auth.bcrypt_cost,
        }
    }
}

/// Application router with the session and tracing layers applied
///
/// `/health` sits outside the session layer so probes never create sessions.
pub fn create_router(state: AppState) -> Router {
    let app = features::router()
        .layer(from_fn_with_state(state.clone(), crate::session::session_layer));

    Router::new()
        .route("/health", get(health))
        .merge(app)
        .layer(middleware::tracing_layer())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<Response, StatusCode> {
    match db::health_check(&state.db).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}
