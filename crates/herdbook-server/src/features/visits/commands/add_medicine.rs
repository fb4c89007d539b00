use sqlx::SqlitePool;

use super::form::MedicineForm;
use crate::{features::shared::FieldErrors, models::Medicine};

#[derive(Debug, thiserror::Error)]
pub enum AddMedicineError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Visit {0} not found")]
    VisitNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Attach a prescribed medicine to a visit
#[tracing::instrument(skip(pool, command), fields(medicine = %command.medicine_name))]
pub async fn handle(
    pool: &SqlitePool,
    visit_id: i64,
    command: MedicineForm,
) -> Result<Medicine, AddMedicineError> {
    let visit_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM veterinary_visits WHERE id = ?)")
            .bind(visit_id)
            .fetch_one(pool)
            .await?;
    if !visit_exists {
        return Err(AddMedicineError::VisitNotFound(visit_id));
    }

    let valid = command.validate().map_err(AddMedicineError::Validation)?;

    let medicine = sqlx::query_as::<_, Medicine>(
        r#"
        INSERT INTO medicines (visit_id, medicine_name, dosage, frequency, duration, route,
                               start_date, end_date, instructions)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(visit_id)
    .bind(&valid.medicine_name)
    .bind(&valid.dosage)
    .bind(&valid.frequency)
    .bind(&valid.duration)
    .bind(&valid.route)
    .bind(valid.start_date)
    .bind(valid.end_date)
    .bind(&valid.instructions)
    .fetch_one(pool)
    .await?;

    tracing::info!(medicine_id = medicine.id, "Medicine added");
    Ok(medicine)
}
