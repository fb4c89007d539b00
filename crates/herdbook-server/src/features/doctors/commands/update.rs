use sqlx::SqlitePool;

use super::form::DoctorForm;
use crate::{
    features::shared::{error_helpers::map_unique_violation, FieldErrors},
    models::Doctor,
};

#[derive(Debug, thiserror::Error)]
pub enum UpdateDoctorError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Doctor {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: &SqlitePool,
    doctor_id: i64,
    command: DoctorForm,
) -> Result<Doctor, UpdateDoctorError> {
    let valid = command.validate().map_err(UpdateDoctorError::Validation)?;

    let doctor = sqlx::query_as::<_, Doctor>(
        r#"
        UPDATE doctors
        SET name = ?, qualification = ?, specialization = ?, license_number = ?,
            phone_number = ?, email = ?, clinic_name = ?, address = ?
        WHERE id = ?
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
    .bind(doctor_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_unique_violation(e, "license_number", UpdateDoctorError::Validation, UpdateDoctorError::Database)
    })?
    .ok_or(UpdateDoctorError::NotFound(doctor_id))?;

    tracing::info!("Doctor updated");
    Ok(doctor)
}
