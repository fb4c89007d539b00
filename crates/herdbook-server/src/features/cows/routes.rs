//! Cow routes
//!
//! - `GET /cows/` - active cows
//! - `GET|POST /cows/create/` - add a cow (admin)
//! - `GET /cows/:id/` - cow detail with its veterinary history
//! - `GET|POST /cows/:id/update/` - edit (admin)
//! - `GET|POST /cows/:id/delete/` - confirm and deactivate (admin)

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use herdbook_common::Message;
use serde::Serialize;

use super::{
    commands::{CowForm, CreateCowError, DeactivateCowError, UpdateCowError},
    queries::{GetCowError, ListCowsError},
};
use crate::{
    api::{
        response::{form_page, invalid_form, redirect_with_success, Page},
        AppState,
    },
    auth::{require_admin, DASHBOARD_PATH},
    error::{AppError, AppResult},
    models::Cow,
    session::AuthContext,
};

const COW_LIST_PATH: &str = "/cows/";

pub fn cows_routes() -> Router<AppState> {
    Router::new()
        .route("/cows/", get(list_cows))
        .route("/cows/create/", get(new_cow).post(create_cow))
        .route("/cows/:id/", get(cow_detail))
        .route("/cows/:id/update/", get(edit_cow).post(update_cow))
        .route("/cows/:id/delete/", get(confirm_deactivate).post(deactivate_cow))
}

pub(crate) fn cow_detail_path(cow_id: i64) -> String {
    format!("/cows/{}/", cow_id)
}

#[derive(Debug, Serialize)]
struct CowListView {
    cows: Vec<Cow>,
}

#[derive(Debug, Serialize)]
struct CowView {
    cow: Cow,
}

#[derive(Debug, Serialize)]
struct CowFormExtra {
    #[serde(skip_serializing_if = "Option::is_none")]
    cow: Option<Cow>,
}

async fn list_cows(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let cows = super::queries::list::handle(&state.db).await?;
    Ok(Page::new(&auth.request, "cows/list", CowListView { cows }).into_response())
}

async fn cow_detail(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    let detail = super::queries::get::handle(&state.db, cow_id).await?;
    Ok(Page::new(&auth.request, "cows/detail", detail).into_response())
}

async fn new_cow(auth: AuthContext) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    Ok(form_page(&auth.request, "cows/form", CowForm::default(), CowFormExtra { cow: None }))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<CowForm>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;

    match super::commands::create::handle(&state.db, &auth.actor, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(COW_LIST_PATH, Message::CowAdded)),
        Err(CreateCowError::Validation(errors)) => Ok(invalid_form(
            &auth.request,
            "cows/form",
            command,
            &errors,
            CowFormExtra { cow: None },
        )),
        Err(e) => Err(e.into()),
    }
}

async fn edit_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let cow = super::queries::get::find(&state.db, cow_id).await?;
    Ok(form_page(
        &auth.request,
        "cows/form",
        CowForm::from_cow(&cow),
        CowFormExtra { cow: Some(cow) },
    ))
}

#[tracing::instrument(skip_all, fields(cow_id, user_id = auth.actor.user_id))]
async fn update_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
    Form(command): Form<CowForm>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let cow = super::queries::get::find(&state.db, cow_id).await?;

    match super::commands::update::handle(&state.db, cow_id, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(cow_detail_path(cow_id), Message::CowUpdated)),
        Err(UpdateCowError::Validation(errors)) => Ok(invalid_form(
            &auth.request,
            "cows/form",
            command,
            &errors,
            CowFormExtra { cow: Some(cow) },
        )),
        Err(e) => Err(e.into()),
    }
}

async fn confirm_deactivate(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let cow = super::queries::get::find(&state.db, cow_id).await?;
    Ok(Page::new(&auth.request, "cows/confirm_delete", CowView { cow }).into_response())
}

#[tracing::instrument(skip_all, fields(cow_id, user_id = auth.actor.user_id))]
async fn deactivate_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    super::commands::deactivate::handle(&state.db, cow_id).await?;
    Ok(redirect_with_success(COW_LIST_PATH, Message::CowDeactivated))
}

impl From<ListCowsError> for AppError {
    fn from(err: ListCowsError) -> Self {
        match err {
            ListCowsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetCowError> for AppError {
    fn from(err: GetCowError) -> Self {
        match err {
            GetCowError::NotFound(id) => AppError::not_found("Cow", id),
            GetCowError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateCowError> for AppError {
    fn from(err: CreateCowError) -> Self {
        match err {
            CreateCowError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateCowError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateCowError> for AppError {
    fn from(err: UpdateCowError) -> Self {
        match err {
            UpdateCowError::NotFound(id) => AppError::not_found("Cow", id),
            UpdateCowError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            UpdateCowError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeactivateCowError> for AppError {
    fn from(err: DeactivateCowError) -> Self {
        match err {
            DeactivateCowError::NotFound(id) => AppError::not_found("Cow", id),
            DeactivateCowError::Database(e) => AppError::Database(e),
        }
    }
}
