//! Pregnancy routes
//!
//! `:id` is the cow on `/veterinary/pregnancy/:id/create/` and the pregnancy
//! on update and delete. Recording and editing are open to every signed-in
//! user; deleting is admin only.

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
    commands::{CreatePregnancyError, DeletePregnancyError, PregnancyForm, UpdatePregnancyError},
    queries::{GetPregnancyError, ListPregnanciesError, PregnancyListItem},
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
        shared::{choices, Choice, ChoiceOption},
    },
    models::Cow,
    session::AuthContext,
};

const PREGNANCY_LIST_PATH: &str = "/veterinary/pregnancy/";
const FORM_VIEW: &str = "veterinary/pregnancy/form";

pub fn pregnancies_routes() -> Router<AppState> {
    Router::new()
        .route("/veterinary/pregnancy/", get(list_pregnancies))
        .route("/veterinary/pregnancy/create/", get(new_pregnancy).post(create_pregnancy))
        .route(
            "/veterinary/pregnancy/:id/create/",
            get(new_pregnancy_for_cow).post(create_pregnancy_for_cow),
        )
        .route("/veterinary/pregnancy/:id/update/", get(edit_pregnancy).post(update_pregnancy))
        .route("/veterinary/pregnancy/:id/delete/", get(confirm_delete).post(delete_pregnancy))
}

#[derive(Debug, Serialize)]
struct PregnancyListView {
    pregnancies: Vec<PregnancyListItem>,
}

#[derive(Debug, Serialize)]
struct PregnancyView {
    pregnancy: PregnancyListItem,
}

#[derive(Debug, Serialize)]
struct PregnancyFormExtra {
    #[serde(skip_serializing_if = "Option::is_none")]
    cow: Option<Cow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pregnancy: Option<PregnancyListItem>,
    cows: Vec<Choice>,
    doctors: Vec<Choice>,
    ai_records: Vec<Choice>,
    statuses: Vec<ChoiceOption>,
    calf_genders: Vec<ChoiceOption>,
}

impl PregnancyFormExtra {
    async fn load(
        pool: &SqlitePool,
        cow: Option<Cow>,
        pregnancy: Option<PregnancyListItem>,
    ) -> Result<Self, sqlx::Error> {
        let keep = pregnancy.as_ref().and_then(|p| p.pregnancy.ai_record_id);
        Ok(Self {
            cow,
            pregnancy,
            cows: choices::active_cows(pool).await?,
            doctors: choices::active_doctors(pool).await?,
            ai_records: choices::unlinked_ai_records(pool, keep).await?,
            statuses: choices::pregnancy_statuses(),
            calf_genders: choices::calf_genders(),
        })
    }
}

async fn list_pregnancies(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let pregnancies = super::queries::list::handle(&state.db, None).await?;
    Ok(Page::new(&auth.request, "veterinary/pregnancy/list", PregnancyListView { pregnancies })
        .into_response())
}

async fn new_pregnancy(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let extra = PregnancyFormExtra::load(&state.db, None, None).await?;
    Ok(form_page(&auth.request, FORM_VIEW, PregnancyForm::initial(None), extra))
}

async fn new_pregnancy_for_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    let cow = cow_get::find(&state.db, cow_id).await?;
    let extra = PregnancyFormExtra::load(&state.db, Some(cow), None).await?;
    Ok(form_page(&auth.request, FORM_VIEW, PregnancyForm::initial(Some(cow_id)), extra))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_pregnancy(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<PregnancyForm>,
) -> AppResult<Response> {
    create(&state, &auth, None, command).await
}

#[tracing::instrument(skip_all, fields(cow_id, user_id = auth.actor.user_id))]
async fn create_pregnancy_for_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
    Form(command): Form<PregnancyForm>,
) -> AppResult<Response> {
    create(&state, &auth, Some(cow_id), command).await
}

async fn create(
    state: &AppState,
    auth: &AuthContext,
    path_cow: Option<i64>,
    command: PregnancyForm,
) -> AppResult<Response> {
    match super::commands::create::handle(&state.db, &auth.actor, path_cow, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(PREGNANCY_LIST_PATH, Message::PregnancyRecorded)),
        Err(CreatePregnancyError::Validation(errors)) => {
            let cow = match path_cow {
                Some(cow_id) => Some(cow_get::find(&state.db, cow_id).await?),
                None => None,
            };
            let extra = PregnancyFormExtra::load(&state.db, cow, None).await?;
            Ok(invalid_form(&auth.request, FORM_VIEW, command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn edit_pregnancy(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(pregnancy_id): Path<i64>,
) -> AppResult<Response> {
    let pregnancy = super::queries::list::get(&state.db, pregnancy_id).await?;
    let form = PregnancyForm::from_pregnancy(&pregnancy.pregnancy);
    let extra = PregnancyFormExtra::load(&state.db, None, Some(pregnancy)).await?;
    Ok(form_page(&auth.request, FORM_VIEW, form, extra))
}

#[tracing::instrument(skip_all, fields(pregnancy_id, user_id = auth.actor.user_id))]
async fn update_pregnancy(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(pregnancy_id): Path<i64>,
    Form(command): Form<PregnancyForm>,
) -> AppResult<Response> {
    let pregnancy = super::queries::list::get(&state.db, pregnancy_id).await?;

    match super::commands::update::handle(&state.db, pregnancy_id, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(PREGNANCY_LIST_PATH, Message::PregnancyUpdated)),
        Err(UpdatePregnancyError::Validation(errors)) => {
            let extra = PregnancyFormExtra::load(&state.db, None, Some(pregnancy)).await?;
            Ok(invalid_form(&auth.request, FORM_VIEW, command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn confirm_delete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(pregnancy_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let pregnancy = super::queries::list::get(&state.db, pregnancy_id).await?;
    Ok(Page::new(&auth.request, "veterinary/pregnancy/confirm_delete", PregnancyView { pregnancy })
        .into_response())
}

#[tracing::instrument(skip_all, fields(pregnancy_id, user_id = auth.actor.user_id))]
async fn delete_pregnancy(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(pregnancy_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    super::commands::delete::handle(&state.db, pregnancy_id).await?;
    Ok(redirect_with_success(PREGNANCY_LIST_PATH, Message::PregnancyDeleted))
}

impl From<ListPregnanciesError> for AppError {
    fn from(err: ListPregnanciesError) -> Self {
        match err {
            ListPregnanciesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetPregnancyError> for AppError {
    fn from(err: GetPregnancyError) -> Self {
        match err {
            GetPregnancyError::NotFound(id) => AppError::not_found("Pregnancy", id),
            GetPregnancyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreatePregnancyError> for AppError {
    fn from(err: CreatePregnancyError) -> Self {
        match err {
            CreatePregnancyError::CowNotFound(id) => AppError::not_found("Cow", id),
            CreatePregnancyError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreatePregnancyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdatePregnancyError> for AppError {
    fn from(err: UpdatePregnancyError) -> Self {
        match err {
            UpdatePregnancyError::NotFound(id) => AppError::not_found("Pregnancy", id),
            UpdatePregnancyError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            UpdatePregnancyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeletePregnancyError> for AppError {
    fn from(err: DeletePregnancyError) -> Self {
        match err {
            DeletePregnancyError::NotFound(id) => AppError::not_found("Pregnancy", id),
            DeletePregnancyError::Database(e) => AppError::Database(e),
        }
    }
}
