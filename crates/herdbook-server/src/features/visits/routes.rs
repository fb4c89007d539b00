//! Visit and medicine routes
//!
//! `:id` is the cow on `/veterinary/visits/:id/create/` and the visit
//! everywhere else.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use herdbook_common::Message;
use serde::Serialize;
use sqlx::SqlitePool;

use super::{
    commands::{AddMedicineError, CreateVisitError, DeleteVisitError, MedicineForm, VisitForm},
    queries::{GetVisitError, ListVisitsError, VisitDetail},
};
use crate::{
    api::{
        response::{form_page, invalid_form, redirect_with_success, Page},
        AppState,
    },
    auth::{require_admin, DASHBOARD_PATH},
    error::{AppError, AppResult},
    features::{
        cows::{queries::get as cow_get, routes::cow_detail_path},
        shared::{choices, Choice, ChoiceOption},
    },
    models::Cow,
    session::AuthContext,
};

pub fn visits_routes() -> Router<AppState> {
    Router::new()
        .route("/veterinary/visits/:id/create/", get(new_visit).post(create_visit))
        .route("/veterinary/visits/:id/", get(visit_detail))
        .route("/veterinary/visits/:id/delete/", get(confirm_delete).post(delete_visit))
        .route(
            "/veterinary/visits/:id/medicine/create/",
            get(new_medicine).post(add_medicine),
        )
}

fn visit_detail_path(visit_id: i64) -> String {
    format!("/veterinary/visits/{}/", visit_id)
}

#[derive(Debug, Serialize)]
struct VisitFormExtra {
    cow: Cow,
    doctors: Vec<Choice>,
    visit_types: Vec<ChoiceOption>,
}

impl VisitFormExtra {
    async fn load(pool: &SqlitePool, cow: Cow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            cow,
            doctors: choices::active_doctors(pool).await?,
            visit_types: choices::visit_types(),
        })
    }
}

#[derive(Debug, Serialize)]
struct MedicineFormExtra {
    visit: VisitDetail,
}

async fn new_visit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    let cow = cow_get::find(&state.db, cow_id).await?;
    let extra = VisitFormExtra::load(&state.db, cow).await?;
    Ok(form_page(&auth.request, "veterinary/visits/form", VisitForm::initial(), extra))
}

#[tracing::instrument(skip_all, fields(cow_id, user_id = auth.actor.user_id))]
async fn create_visit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
    Form(command): Form<VisitForm>,
) -> AppResult<Response> {
    match super::commands::create::handle(&state.db, &auth.actor, cow_id, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(cow_detail_path(cow_id), Message::VisitRecorded)),
        Err(CreateVisitError::Validation(errors)) => {
            let cow = cow_get::find(&state.db, cow_id).await?;
            let extra = VisitFormExtra::load(&state.db, cow).await?;
            Ok(invalid_form(&auth.request, "veterinary/visits/form", command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn visit_detail(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(visit_id): Path<i64>,
) -> AppResult<Response> {
    let detail = super::queries::get::handle(&state.db, visit_id).await?;
    Ok(Page::new(&auth.request, "veterinary/visits/detail", detail).into_response())
}

async fn confirm_delete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(visit_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let detail = super::queries::get::handle(&state.db, visit_id).await?;
    Ok(Page::new(&auth.request, "veterinary/visits/confirm_delete", detail).into_response())
}

#[tracing::instrument(skip_all, fields(visit_id, user_id = auth.actor.user_id))]
async fn delete_visit(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(visit_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let cow_id = super::commands::delete::handle(&state.db, visit_id).await?;
    Ok(redirect_with_success(cow_detail_path(cow_id), Message::VisitDeleted))
}

async fn new_medicine(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(visit_id): Path<i64>,
) -> AppResult<Response> {
    let visit = super::queries::get::handle(&state.db, visit_id).await?;
    Ok(form_page(
        &auth.request,
        "veterinary/medicines/form",
        MedicineForm::default(),
        MedicineFormExtra { visit },
    ))
}

#[tracing::instrument(skip_all, fields(visit_id, user_id = auth.actor.user_id))]
async fn add_medicine(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(visit_id): Path<i64>,
    Form(command): Form<MedicineForm>,
) -> AppResult<Response> {
    match super::commands::add_medicine::handle(&state.db, visit_id, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(visit_detail_path(visit_id), Message::MedicineAdded)),
        Err(AddMedicineError::Validation(errors)) => {
            let visit = super::queries::get::handle(&state.db, visit_id).await?;
            Ok(invalid_form(
                &auth.request,
                "veterinary/medicines/form",
                command,
                &errors,
                MedicineFormExtra { visit },
            ))
        },
        Err(e) => Err(e.into()),
    }
}

impl From<ListVisitsError> for AppError {
    fn from(err: ListVisitsError) -> Self {
        match err {
            ListVisitsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetVisitError> for AppError {
    fn from(err: GetVisitError) -> Self {
        match err {
            GetVisitError::NotFound(id) => AppError::not_found("Visit", id),
            GetVisitError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateVisitError> for AppError {
    fn from(err: CreateVisitError) -> Self {
        match err {
            CreateVisitError::CowNotFound(id) => AppError::not_found("Cow", id),
            CreateVisitError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateVisitError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteVisitError> for AppError {
    fn from(err: DeleteVisitError) -> Self {
        match err {
            DeleteVisitError::NotFound(id) => AppError::not_found("Visit", id),
            DeleteVisitError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AddMedicineError> for AppError {
    fn from(err: AddMedicineError) -> Self {
        match err {
            AddMedicineError::VisitNotFound(id) => AppError::not_found("Visit", id),
            AddMedicineError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            AddMedicineError::Database(e) => AppError::Database(e),
        }
    }
}
