//! Vaccination routes
//!
//! - `GET /veterinary/vaccination/` - all vaccinations, newest first
//! - `GET|POST /veterinary/vaccination/create/` - cow picked in the form
//! - `GET|POST /veterinary/vaccination/:id/create/` - for cow `:id`
//! - `GET|POST /veterinary/vaccination/:id/delete/` - confirm and delete (admin)

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
    commands::{CreateVaccinationError, DeleteVaccinationError, VaccinationForm},
    queries::{GetVaccinationError, ListVaccinationsError, VaccinationListItem},
};
use crate::{
    api::{
        response::{form_page, invalid_form, redirect_with_success, Page},
        AppState,
    },
    auth::{require_admin, DASHBOARD_PATH},
    error::{AppError, AppResult},
    features::{
        cows::queries::get as cow_get,
        shared::{choices, Choice},
    },
    models::Cow,
    session::AuthContext,
};

const VACCINATION_LIST_PATH: &str = "/veterinary/vaccination/";
const FORM_VIEW: &str = "veterinary/vaccination/form";

pub fn vaccinations_routes() -> Router<AppState> {
    Router::new()
        .route("/veterinary/vaccination/", get(list_vaccinations))
        .route(
            "/veterinary/vaccination/create/",
            get(new_vaccination).post(create_vaccination),
        )
        .route(
            "/veterinary/vaccination/:id/create/",
            get(new_vaccination_for_cow).post(create_vaccination_for_cow),
        )
        .route(
            "/veterinary/vaccination/:id/delete/",
            get(confirm_delete).post(delete_vaccination),
        )
}

#[derive(Debug, Serialize)]
struct VaccinationListView {
    vaccinations: Vec<VaccinationListItem>,
}

#[derive(Debug, Serialize)]
struct VaccinationView {
    vaccination: VaccinationListItem,
}

#[derive(Debug, Serialize)]
struct VaccinationFormExtra {
    #[serde(skip_serializing_if = "Option::is_none")]
    cow: Option<Cow>,
    cows: Vec<Choice>,
    doctors: Vec<Choice>,
}

impl VaccinationFormExtra {
    async fn load(pool: &SqlitePool, cow: Option<Cow>) -> Result<Self, sqlx::Error> {
        Ok(Self {
            cow,
            cows: choices::active_cows(pool).await?,
            doctors: choices::active_doctors(pool).await?,
        })
    }
}

async fn list_vaccinations(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let vaccinations = super::queries::list::handle(&state.db, None).await?;
    Ok(Page::new(
        &auth.request,
        "veterinary/vaccination/list",
        VaccinationListView { vaccinations },
    )
    .into_response())
}

async fn new_vaccination(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let extra = VaccinationFormExtra::load(&state.db, None).await?;
    Ok(form_page(&auth.request, FORM_VIEW, VaccinationForm::initial(None), extra))
}

async fn new_vaccination_for_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    let cow = cow_get::find(&state.db, cow_id).await?;
    let extra = VaccinationFormExtra::load(&state.db, Some(cow)).await?;
    Ok(form_page(&auth.request, FORM_VIEW, VaccinationForm::initial(Some(cow_id)), extra))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_vaccination(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<VaccinationForm>,
) -> AppResult<Response> {
    create(&state, &auth, None, command).await
}

#[tracing::instrument(skip_all, fields(cow_id, user_id = auth.actor.user_id))]
async fn create_vaccination_for_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
    Form(command): Form<VaccinationForm>,
) -> AppResult<Response> {
    create(&state, &auth, Some(cow_id), command).await
}

async fn create(
    state: &AppState,
    auth: &AuthContext,
    path_cow: Option<i64>,
    command: VaccinationForm,
) -> AppResult<Response> {
    match super::commands::create::handle(&state.db, &auth.actor, path_cow, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(VACCINATION_LIST_PATH, Message::VaccinationRecorded)),
        Err(CreateVaccinationError::Validation(errors)) => {
            let cow = match path_cow {
                Some(cow_id) => Some(cow_get::find(&state.db, cow_id).await?),
                None => None,
            };
            let extra = VaccinationFormExtra::load(&state.db, cow).await?;
            Ok(invalid_form(&auth.request, FORM_VIEW, command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn confirm_delete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(vaccination_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let vaccination = super::queries::list::get(&state.db, vaccination_id).await?;
    Ok(Page::new(
        &auth.request,
        "veterinary/vaccination/confirm_delete",
        VaccinationView { vaccination },
    )
    .into_response())
}

#[tracing::instrument(skip_all, fields(vaccination_id, user_id = auth.actor.user_id))]
async fn delete_vaccination(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(vaccination_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    super::commands::delete::handle(&state.db, vaccination_id).await?;
    Ok(redirect_with_success(VACCINATION_LIST_PATH, Message::VaccinationDeleted))
}

impl From<ListVaccinationsError> for AppError {
    fn from(err: ListVaccinationsError) -> Self {
        match err {
            ListVaccinationsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetVaccinationError> for AppError {
    fn from(err: GetVaccinationError) -> Self {
        match err {
            GetVaccinationError::NotFound(id) => AppError::not_found("Vaccination", id),
            GetVaccinationError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateVaccinationError> for AppError {
    fn from(err: CreateVaccinationError) -> Self {
        match err {
            CreateVaccinationError::CowNotFound(id) => AppError::not_found("Cow", id),
            CreateVaccinationError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateVaccinationError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteVaccinationError> for AppError {
    fn from(err: DeleteVaccinationError) -> Self {
        match err {
            DeleteVaccinationError::NotFound(id) => AppError::not_found("Vaccination", id),
            DeleteVaccinationError::Database(e) => AppError::Database(e),
        }
    }
}
