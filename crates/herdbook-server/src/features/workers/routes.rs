//! Worker management routes, admin only
//!
//! - `GET /workers/` - active workers
//! - `GET|POST /workers/create/` - new worker account
//! - `GET|POST /workers/:id/delete/` - confirm and deactivate

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use herdbook_common::Message;
use serde::Serialize;

use super::{
    commands::{CreateWorkerCommand, CreateWorkerError, DeactivateWorkerError},
    queries::{GetWorkerError, ListWorkersError, WorkerListItem},
};
use crate::{
    api::{
        response::{form_page, invalid_form, redirect_with_success, Page},
        AppState,
    },
    auth::{require_admin, DASHBOARD_PATH},
    error::{AppError, AppResult},
    session::AuthContext,
};

const WORKER_LIST_PATH: &str = "/workers/";

pub fn workers_routes() -> Router<AppState> {
    Router::new()
        .route("/workers/", get(list_workers))
        .route("/workers/create/", get(new_worker).post(create_worker))
        .route("/workers/:id/delete/", get(confirm_deactivate).post(deactivate_worker))
}

#[derive(Debug, Serialize)]
struct WorkerListView {
    workers: Vec<WorkerListItem>,
}

#[derive(Debug, Serialize)]
struct WorkerView {
    worker: WorkerListItem,
}

async fn list_workers(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let workers = super::queries::list::handle(&state.db).await?;
    Ok(Page::new(&auth.request, "workers/list", WorkerListView { workers }).into_response())
}

async fn new_worker(auth: AuthContext) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    Ok(form_page(&auth.request, "workers/form", CreateWorkerCommand::default(), ()))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_worker(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<CreateWorkerCommand>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;

    match super::commands::create::handle(&state.db, state.bcrypt_cost, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(WORKER_LIST_PATH, Message::WorkerCreated)),
        Err(CreateWorkerError::Validation(errors)) => {
            Ok(invalid_form(&auth.request, "workers/form", command, &errors, ()))
        },
        Err(e) => Err(e.into()),
    }
}

async fn confirm_deactivate(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(worker_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let worker = super::queries::list::get(&state.db, worker_id).await?;
    Ok(Page::new(&auth.request, "workers/confirm_delete", WorkerView { worker }).into_response())
}

#[tracing::instrument(skip_all, fields(worker_id, user_id = auth.actor.user_id))]
async fn deactivate_worker(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(worker_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    super::commands::deactivate::handle(&state.db, worker_id).await?;
    Ok(redirect_with_success(WORKER_LIST_PATH, Message::WorkerDeactivated))
}

impl From<ListWorkersError> for AppError {
    fn from(err: ListWorkersError) -> Self {
        match err {
            ListWorkersError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetWorkerError> for AppError {
    fn from(err: GetWorkerError) -> Self {
        match err {
            GetWorkerError::NotFound(id) => AppError::not_found("Worker", id),
            GetWorkerError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateWorkerError> for AppError {
    fn from(err: CreateWorkerError) -> Self {
        match err {
            CreateWorkerError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateWorkerError::Password(e) => AppError::Password(e),
            CreateWorkerError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeactivateWorkerError> for AppError {
    fn from(err: DeactivateWorkerError) -> Self {
        match err {
            DeactivateWorkerError::NotFound(id) => AppError::not_found("Worker", id),
            DeactivateWorkerError::Database(e) => AppError::Database(e),
        }
    }
}
