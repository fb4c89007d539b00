//! Doctor routes
//!
//! Non-admins trying to manage doctors land back on the doctor list.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use herdbook_common::Message;
use serde::Serialize;

use super::{
    commands::{CreateDoctorError, DeactivateDoctorError, DoctorForm, UpdateDoctorError},
    queries::{GetDoctorError, ListDoctorsError},
};
use crate::{
    api::{
        response::{form_page, invalid_form, redirect_with_success, Page},
        AppState,
    },
    auth::require_admin,
    error::{AppError, AppResult},
    models::Doctor,
    session::AuthContext,
};

pub(crate) const DOCTOR_LIST_PATH: &str = "/veterinary/doctors/";

pub fn doctors_routes() -> Router<AppState> {
    Router::new()
        .route("/veterinary/doctors/", get(list_doctors))
        .route("/veterinary/doctors/create/", get(new_doctor).post(create_doctor))
        .route("/veterinary/doctors/:id/update/", get(edit_doctor).post(update_doctor))
        .route(
            "/veterinary/doctors/:id/delete/",
            get(confirm_deactivate).post(deactivate_doctor),
        )
}

#[derive(Debug, Serialize)]
struct DoctorListView {
    doctors: Vec<Doctor>,
}

#[derive(Debug, Serialize)]
struct DoctorView {
    doctor: Doctor,
}

#[derive(Debug, Serialize)]
struct DoctorFormExtra {
    #[serde(skip_serializing_if = "Option::is_none")]
    doctor: Option<Doctor>,
}

async fn list_doctors(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let doctors = super::queries::list::handle(&state.db).await?;
    Ok(Page::new(&auth.request, "veterinary/doctors/list", DoctorListView { doctors }).into_response())
}

async fn new_doctor(auth: AuthContext) -> AppResult<Response> {
    require_admin(&auth.actor, DOCTOR_LIST_PATH)?;
    Ok(form_page(
        &auth.request,
        "veterinary/doctors/form",
        DoctorForm::default(),
        DoctorFormExtra { doctor: None },
    ))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_doctor(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<DoctorForm>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DOCTOR_LIST_PATH)?;

    match super::commands::create::handle(&state.db, &auth.actor, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(DOCTOR_LIST_PATH, Message::DoctorAdded)),
        Err(CreateDoctorError::Validation(errors)) => Ok(invalid_form(
            &auth.request,
            "veterinary/doctors/form",
            command,
            &errors,
            DoctorFormExtra { doctor: None },
        )),
        Err(e) => Err(e.into()),
    }
}

async fn edit_doctor(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(doctor_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DOCTOR_LIST_PATH)?;
    let doctor = super::queries::list::get(&state.db, doctor_id).await?;
    Ok(form_page(
        &auth.request,
        "veterinary/doctors/form",
        DoctorForm::from_doctor(&doctor),
        DoctorFormExtra {
            doctor: Some(doctor),
        },
    ))
}

#[tracing::instrument(skip_all, fields(doctor_id, user_id = auth.actor.user_id))]
async fn update_doctor(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(doctor_id): Path<i64>,
    Form(command): Form<DoctorForm>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DOCTOR_LIST_PATH)?;
    let doctor = super::queries::list::get(&state.db, doctor_id).await?;

    match super::commands::update::handle(&state.db, doctor_id, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(DOCTOR_LIST_PATH, Message::DoctorUpdated)),
        Err(UpdateDoctorError::Validation(errors)) => Ok(invalid_form(
            &auth.request,
            "veterinary/doctors/form",
            command,
            &errors,
            DoctorFormExtra {
                doctor: Some(doctor),
            },
        )),
        Err(e) => Err(e.into()),
    }
}

async fn confirm_deactivate(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(doctor_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DOCTOR_LIST_PATH)?;
    let doctor = super::queries::list::get(&state.db, doctor_id).await?;
    Ok(Page::new(&auth.request, "veterinary/doctors/confirm_delete", DoctorView { doctor })
        .into_response())
}

#[tracing::instrument(skip_all, fields(doctor_id, user_id = auth.actor.user_id))]
async fn deactivate_doctor(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(doctor_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DOCTOR_LIST_PATH)?;
    super::commands::deactivate::handle(&state.db, doctor_id).await?;
    Ok(redirect_with_success(DOCTOR_LIST_PATH, Message::DoctorDeactivated))
}

impl From<ListDoctorsError> for AppError {
    fn from(err: ListDoctorsError) -> Self {
        match err {
            ListDoctorsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetDoctorError> for AppError {
    fn from(err: GetDoctorError) -> Self {
        match err {
            GetDoctorError::NotFound(id) => AppError::not_found("Doctor", id),
            GetDoctorError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateDoctorError> for AppError {
    fn from(err: CreateDoctorError) -> Self {
        match err {
            CreateDoctorError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateDoctorError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateDoctorError> for AppError {
    fn from(err: UpdateDoctorError) -> Self {
        match err {
            UpdateDoctorError::NotFound(id) => AppError::not_found("Doctor", id),
            UpdateDoctorError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            UpdateDoctorError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeactivateDoctorError> for AppError {
    fn from(err: DeactivateDoctorError) -> Self {
        match err {
            DeactivateDoctorError::NotFound(id) => AppError::not_found("Doctor", id),
            DeactivateDoctorError::Database(e) => AppError::Database(e),
        }
    }
}
