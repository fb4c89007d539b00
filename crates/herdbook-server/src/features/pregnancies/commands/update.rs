//! Edit a pregnancy
//!
//! The status is free-running; any status may follow any other.

use chrono::Utc;
use sqlx::SqlitePool;

use super::form::{check_ai_record, PregnancyForm};
use crate::{
    features::shared::{error_helpers::map_unique_violation, records, FieldErrors},
    models::Pregnancy,
};

#[derive(Debug, thiserror::Error)]
pub enum UpdatePregnancyError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Pregnancy {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: &SqlitePool,
    pregnancy_id: i64,
    command: PregnancyForm,
) -> Result<Pregnancy, UpdatePregnancyError> {
    let current_cow: i64 = sqlx::query_scalar("SELECT cow_id FROM pregnancies WHERE id = ?")
        .bind(pregnancy_id)
        .fetch_optional(pool)
        .await?
        .ok_or(UpdatePregnancyError::NotFound(pregnancy_id))?;

    let valid = command.validate(None).map_err(UpdatePregnancyError::Validation)?;
    let mut errors = records::check_selections(
        pool,
        Some(valid.cow_id),
        Some(current_cow),
        "confirmed_by",
        valid.confirmed_by,
    )
    .await?;
    if let Some(ai_record_id) = valid.ai_record_id {
        if let Some(error) = check_ai_record(pool, ai_record_id, valid.cow_id, Some(pregnancy_id)).await? {
            errors.add("ai_record", error);
        }
    }
    if !errors.is_empty() {
        return Err(UpdatePregnancyError::Validation(errors));
    }

    let pregnancy = sqlx::query_as::<_, Pregnancy>(
        r#"
        UPDATE pregnancies
        SET cow_id = ?, ai_record_id = ?, confirmation_date = ?, confirmed_by = ?,
            pregnancy_status = ?, expected_delivery_date = ?, actual_delivery_date = ?,
            pregnancy_duration = ?, calf_gender = ?, calf_weight = ?, delivery_type = ?,
            complications = ?, doctor_notes = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(valid.cow_id)
    .bind(valid.ai_record_id)
    .bind(valid.confirmation_date)
    .bind(valid.confirmed_by)
    .bind(valid.pregnancy_status)
    .bind(valid.expected_delivery_date)
    .bind(valid.actual_delivery_date)
    .bind(valid.pregnancy_duration)
    .bind(valid.calf_gender)
    .bind(valid.calf_weight)
    .bind(&valid.delivery_type)
    .bind(&valid.complications)
    .bind(&valid.doctor_notes)
    .bind(Utc::now())
    .bind(pregnancy_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        map_unique_violation(e, "ai_record", UpdatePregnancyError::Validation, UpdatePregnancyError::Database)
    })?
    .ok_or(UpdatePregnancyError::NotFound(pregnancy_id))?;

    tracing::info!(status = %pregnancy.pregnancy_status, "Pregnancy updated");
    Ok(pregnancy)
}
