use chrono::Utc;
use sqlx::SqlitePool;

use super::form::DoctorForm;
use crate::{
    auth::Actor,
    features::shared::{error_helpers::map_unique_violation, FieldErrors},
    models::Doctor,
};

#[derive(Debug, thiserror::Error)]
pub enum CreateDoctorError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command), fields(added_by = actor.user_id, license = %command.license_number))]
pub async fn handle(
    pool: &SqlitePool,
    actor: &Actor,
    command: DoctorForm,
) -> Result<Doctor, CreateDoctorError> {
    let valid = command.validate().map_err(CreateDoctorError::Validation)?;

    let doctor = sqlx::query_as::<_, Doctor>(
        r#"
        INSERT INTO doctors (name, qualification, specialization, license_number, phone_number,
                             email, clinic_name, address, is_active, added_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&valid.name)
    .bind(&valid.qualification)
    .bind(&valid.specialization)
    .bind(&valid.license_number)
    .bind(&valid.phone_number)
    .bind(&valid.email)
    .bind(&valid.clinic_name)
    .bind(&valid.address)
    .bind(actor.user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_unique_violation(e, "license_number", CreateDoctorError::Validation, CreateDoctorError::Database)
    })?;

    tracing::info!(doctor_id = doctor.id, "Doctor added");
    Ok(doctor)
}
