//! Record an artificial insemination
//!
//! The cow comes from the URL when the form was opened from a cow's page,
//! otherwise from the form's `cow` select.

use chrono::Utc;
use sqlx::SqlitePool;

use super::form::AiForm;
use crate::{
    auth::Actor,
    features::shared::{records, FieldErrors},
    models::ArtificialInsemination,
};

#[derive(Debug, thiserror::Error)]
pub enum CreateAiRecordError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Cow {0} not found")]
    CowNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command), fields(recorded_by = actor.user_id))]
pub async fn handle(
    pool: &SqlitePool,
    actor: &Actor,
    path_cow: Option<i64>,
    command: AiForm,
) -> Result<ArtificialInsemination, CreateAiRecordError> {
    if let Some(cow_id) = path_cow {
        if !records::cow_exists(pool, cow_id).await? {
            return Err(CreateAiRecordError::CowNotFound(cow_id));
        }
    }

    let valid = command.validate(path_cow).map_err(CreateAiRecordError::Validation)?;
    let selected_cow = path_cow.is_none().then_some(valid.cow_id);
    let errors = records::check_selections(pool, selected_cow, None, "doctor", valid.doctor_id).await?;
    if !errors.is_empty() {
        return Err(CreateAiRecordError::Validation(errors));
    }

    let record = sqlx::query_as::<_, ArtificialInsemination>(
        r#"
        INSERT INTO artificial_inseminations (cow_id, doctor_id, ai_date, ai_time, bull_breed,
                                              bull_id, semen_source, heat_detection_date,
                                              technician_name, success_status,
                                              expected_calving_date, cost, notes, recorded_by,
                                              created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(valid.cow_id)
    .bind(valid.doctor_id)
    .bind(valid.ai_date)
    .bind(valid.ai_time)
    .bind(&valid.bull_breed)
    .bind(&valid.bull_id)
    .bind(&valid.semen_source)
    .bind(valid.heat_detection_date)
    .bind(&valid.technician_name)
    .bind(&valid.success_status)
    .bind(valid.expected_calving_date)
    .bind(valid.cost)
    .bind(&valid.notes)
    .bind(actor.user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!(ai_record_id = record.id, cow_id = record.cow_id, "AI record added");
    Ok(record)
}
