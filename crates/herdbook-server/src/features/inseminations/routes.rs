//! AI record routes
//!
//! - `GET /veterinary/ai/` - all records, newest first
//! - `GET|POST /veterinary/ai/create/` - record, cow picked in the form
//! - `GET|POST /veterinary/ai/:id/create/` - record for cow `:id`
//! - `GET /veterinary/ai/:id/` - record with its pregnancy
//! - `GET|POST /veterinary/ai/:id/delete/` - confirm and delete (admin)

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
    commands::{AiForm, CreateAiRecordError, DeleteAiRecordError},
    queries::{AiListItem, GetAiRecordError, ListAiRecordsError},
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
    session::{AuthContext, RequestContext},
};

const AI_LIST_PATH: &str = "/veterinary/ai/";
const FORM_VIEW: &str = "veterinary/ai/form";

pub fn inseminations_routes() -> Router<AppState> {
    Router::new()
        .route("/veterinary/ai/", get(list_ai_records))
        .route("/veterinary/ai/create/", get(new_ai_record).post(create_ai_record))
        .route(
            "/veterinary/ai/:id/create/",
            get(new_ai_record_for_cow).post(create_ai_record_for_cow),
        )
        .route("/veterinary/ai/:id/", get(ai_record_detail))
        .route("/veterinary/ai/:id/delete/", get(confirm_delete).post(delete_ai_record))
}

#[derive(Debug, Serialize)]
struct AiListView {
    ai_records: Vec<AiListItem>,
}

#[derive(Debug, Serialize)]
struct AiFormExtra {
    #[serde(skip_serializing_if = "Option::is_none")]
    cow: Option<Cow>,
    cows: Vec<Choice>,
    doctors: Vec<Choice>,
}

impl AiFormExtra {
    async fn load(pool: &SqlitePool, cow: Option<Cow>) -> Result<Self, sqlx::Error> {
        Ok(Self {
            cow,
            cows: choices::active_cows(pool).await?,
            doctors: choices::active_doctors(pool).await?,
        })
    }
}

async fn list_ai_records(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let ai_records = super::queries::list::handle(&state.db, None).await?;
    Ok(Page::new(&auth.request, "veterinary/ai/list", AiListView { ai_records }).into_response())
}

async fn new_ai_record(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let extra = AiFormExtra::load(&state.db, None).await?;
    Ok(form_page(&auth.request, FORM_VIEW, AiForm::default(), extra))
}

async fn new_ai_record_for_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
) -> AppResult<Response> {
    let cow = cow_get::find(&state.db, cow_id).await?;
    let extra = AiFormExtra::load(&state.db, Some(cow)).await?;
    Ok(form_page(&auth.request, FORM_VIEW, AiForm::for_cow(cow_id), extra))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_ai_record(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<AiForm>,
) -> AppResult<Response> {
    create(&state, &auth, None, command).await
}

#[tracing::instrument(skip_all, fields(cow_id, user_id = auth.actor.user_id))]
async fn create_ai_record_for_cow(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(cow_id): Path<i64>,
    Form(command): Form<AiForm>,
) -> AppResult<Response> {
    create(&state, &auth, Some(cow_id), command).await
}

async fn create(
    state: &AppState,
    auth: &AuthContext,
    path_cow: Option<i64>,
    command: AiForm,
) -> AppResult<Response> {
    match super::commands::create::handle(&state.db, &auth.actor, path_cow, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(AI_LIST_PATH, Message::AiRecordAdded)),
        Err(CreateAiRecordError::Validation(errors)) => {
            let cow = match path_cow {
                Some(cow_id) => Some(cow_get::find(&state.db, cow_id).await?),
                None => None,
            };
            let extra = AiFormExtra::load(&state.db, cow).await?;
            Ok(invalid_form(&auth.request, FORM_VIEW, command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn ai_record_detail(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(ai_record_id): Path<i64>,
) -> AppResult<Response> {
    detail_page(&state, &auth.request, "veterinary/ai/detail", ai_record_id).await
}

async fn confirm_delete(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(ai_record_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    detail_page(&state, &auth.request, "veterinary/ai/confirm_delete", ai_record_id).await
}

async fn detail_page(
    state: &AppState,
    request: &RequestContext,
    view: &'static str,
    ai_record_id: i64,
) -> AppResult<Response> {
    let detail = super::queries::get::handle(&state.db, ai_record_id).await?;
    Ok(Page::new(request, view, detail).into_response())
}

#[tracing::instrument(skip_all, fields(ai_record_id, user_id = auth.actor.user_id))]
async fn delete_ai_record(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(ai_record_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    super::commands::delete::handle(&state.db, ai_record_id).await?;
    Ok(redirect_with_success(AI_LIST_PATH, Message::AiRecordDeleted))
}

impl From<ListAiRecordsError> for AppError {
    fn from(err: ListAiRecordsError) -> Self {
        match err {
            ListAiRecordsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetAiRecordError> for AppError {
    fn from(err: GetAiRecordError) -> Self {
        match err {
            GetAiRecordError::NotFound(id) => AppError::not_found("AI record", id),
            GetAiRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateAiRecordError> for AppError {
    fn from(err: CreateAiRecordError) -> Self {
        match err {
            CreateAiRecordError::CowNotFound(id) => AppError::not_found("Cow", id),
            CreateAiRecordError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateAiRecordError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteAiRecordError> for AppError {
    fn from(err: DeleteAiRecordError) -> Self {
        match err {
            DeleteAiRecordError::NotFound(id) => AppError::not_found("AI record", id),
            DeleteAiRecordError::Database(e) => AppError::Database(e),
        }
    }
}
