//! Record a veterinary visit for a cow
//!
//! The cow's last-checkup date follows the visit date. The two writes are
//! separate statements.

use chrono::Utc;
use sqlx::SqlitePool;

use super::form::VisitForm;
use crate::{
    auth::Actor,
    features::shared::{records, FieldErrors},
    models::VeterinaryVisit,
};

#[derive(Debug, thiserror::Error)]
pub enum CreateVisitError {
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
    cow_id: i64,
    command: VisitForm,
) -> Result<VeterinaryVisit, CreateVisitError> {
    if !records::cow_exists(pool, cow_id).await? {
        return Err(CreateVisitError::CowNotFound(cow_id));
    }

    let valid = command.validate().map_err(CreateVisitError::Validation)?;
    let errors = records::check_selections(pool, None, None, "doctor", valid.doctor_id).await?;
    if !errors.is_empty() {
        return Err(CreateVisitError::Validation(errors));
    }

    let now = Utc::now();
    let visit = sqlx::query_as::<_, VeterinaryVisit>(
        r#"
        INSERT INTO veterinary_visits (cow_id, doctor_id, visit_date, visit_time, visit_type,
                                       reason_for_visit, symptoms, diagnosis, treatment_given,
                                       doctor_instructions, next_visit_date, visit_cost, notes,
                                       recorded_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(cow_id)
    .bind(valid.doctor_id)
    .bind(valid.visit_date)
    .bind(valid.visit_time)
    .bind(valid.visit_type)
    .bind(&valid.reason_for_visit)
    .bind(&valid.symptoms)
    .bind(&valid.diagnosis)
    .bind(&valid.treatment_given)
    .bind(&valid.doctor_instructions)
    .bind(valid.next_visit_date)
    .bind(valid.visit_cost)
    .bind(&valid.notes)
    .bind(actor.user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    sqlx::query("UPDATE cows SET last_checkup = ?, updated_at = ? WHERE id = ?")
        .bind(visit.visit_date)
        .bind(now)
        .bind(cow_id)
        .execute(pool)
        .await?;

    tracing::info!(visit_id = visit.id, cow_id, "Visit recorded");
    Ok(visit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::{
        test_helpers::{actor, date, test_pool, TestCow, TestDoctor, TestUser},
        FieldError,
    };
    use chrono::NaiveDate;

    fn form(doctor_id: i64) -> VisitForm {
        VisitForm {
            doctor: doctor_id.to_string(),
            visit_date: "2024-05-02".to_string(),
            visit_time: "09:30".to_string(),
            visit_type: "treatment".to_string(),
            reason_for_visit: "Limping on hind leg".to_string(),
            ..VisitForm::default()
        }
    }

    #[tokio::test]
    async fn test_visit_updates_last_checkup() {
        let pool = test_pool().await;
        let worker = TestUser::worker("ravi").insert(&pool).await.unwrap();
        let worker = actor(&pool, &worker).await;
        let cow = TestCow::new("C-101").insert(&pool).await.unwrap();
        let doctor = TestDoctor::new("Dr. Joshi", "LIC-1").insert(&pool).await.unwrap();

        let visit = handle(&pool, &worker, cow.id, form(doctor.id)).await.unwrap();
        assert_eq!(visit.cow_id, cow.id);
        assert_eq!(visit.recorded_by, Some(worker.user_id));

        let last_checkup: Option<NaiveDate> =
            sqlx::query_scalar("SELECT last_checkup FROM cows WHERE id = ?")
                .bind(cow.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(last_checkup, Some(date(2024, 5, 2)));
    }

    #[tokio::test]
    async fn test_missing_cow_and_inactive_doctor() {
        let pool = test_pool().await;
        let admin = TestUser::admin("boss").insert(&pool).await.unwrap();
        let admin = actor(&pool, &admin).await;
        let cow = TestCow::new("C-101").insert(&pool).await.unwrap();
        let retired = TestDoctor::new("Dr. Apte", "LIC-3").inactive().insert(&pool).await.unwrap();

        assert!(matches!(
            handle(&pool, &admin, 999, form(retired.id)).await,
            Err(CreateVisitError::CowNotFound(999))
        ));
        match handle(&pool, &admin, cow.id, form(retired.id)).await {
            Err(CreateVisitError::Validation(errors)) => {
                assert!(errors.has("doctor", FieldError::InvalidChoice))
            },
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
