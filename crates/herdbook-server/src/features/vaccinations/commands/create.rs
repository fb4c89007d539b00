use chrono::Utc;
use sqlx::SqlitePool;

use super::form::VaccinationForm;
use crate::{
    auth::Actor,
    features::shared::{records, FieldErrors},
    models::Vaccination,
};

#[derive(Debug, thiserror::Error)]
pub enum CreateVaccinationError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Cow {0} not found")]
    CowNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command), fields(vaccine = %command.vaccine_name, recorded_by = actor.user_id))]
pub async fn handle(
    pool: &SqlitePool,
    actor: &Actor,
    path_cow: Option<i64>,
    command: VaccinationForm,
) -> Result<Vaccination, CreateVaccinationError> {
    if let Some(cow_id) = path_cow {
        if !records::cow_exists(pool, cow_id).await? {
            return Err(CreateVaccinationError::CowNotFound(cow_id));
        }
    }

    let valid = command.validate(path_cow).map_err(CreateVaccinationError::Validation)?;
    let selected_cow = path_cow.is_none().then_some(valid.cow_id);
    let errors =
        records::check_selections(pool, selected_cow, None, "administered_by", valid.administered_by)
            .await?;
    if !errors.is_empty() {
        return Err(CreateVaccinationError::Validation(errors));
    }

    let vaccination = sqlx::query_as::<_, Vaccination>(
        r#"
        INSERT INTO vaccinations (cow_id, vaccine_name, disease_prevention, vaccination_date,
                                  next_due_date, batch_number, administered_by, dosage, route,
                                  notes, recorded_by, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(valid.cow_id)
    .bind(&valid.vaccine_name)
    .bind(&valid.disease_prevention)
    .bind(valid.vaccination_date)
    .bind(valid.next_due_date)
    .bind(&valid.batch_number)
    .bind(valid.administered_by)
    .bind(&valid.dosage)
    .bind(&valid.route)
    .bind(&valid.notes)
    .bind(actor.user_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    tracing::info!(vaccination_id = vaccination.id, cow_id = vaccination.cow_id, "Vaccination recorded");
    Ok(vaccination)
}
