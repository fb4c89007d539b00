use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;

use super::queries::VeterinaryDashboardError;
use crate::{
    api::{response::Page, AppState},
    error::{AppError, AppResult},
    session::AuthContext,
};

pub fn veterinary_routes() -> Router<AppState> {
    Router::new().route("/veterinary/", get(dashboard))
}

async fn dashboard(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let today = Utc::now().date_naive();
    let dashboard = super::queries::dashboard::handle(&state.db, today).await?;
    Ok(Page::new(&auth.request, "veterinary/dashboard", dashboard).into_response())
}

impl From<VeterinaryDashboardError> for AppError {
    fn from(err: VeterinaryDashboardError) -> Self {
        match err {
            VeterinaryDashboardError::Database(e) => AppError::Database(e),
        }
    }
}
