use chrono::Utc;
use sqlx::SqlitePool;

use super::form::{check_ai_record, PregnancyForm};
use crate::{
    auth::Actor,
    features::shared::{error_helpers::map_unique_violation, records, FieldErrors},
    models::Pregnancy,
};

#[derive(Debug, thiserror::Error)]
pub enum CreatePregnancyError {
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
    command: PregnancyForm,
) -> Result<Pregnancy, CreatePregnancyError> {
    if let Some(cow_id) = path_cow {
        if !records::cow_exists(pool, cow_id).await? {
            return Err(CreatePregnancyError::CowNotFound(cow_id));
        }
    }

    let valid = command.validate(path_cow).map_err(CreatePregnancyError::Validation)?;
    let selected_cow = path_cow.is_none().then_some(valid.cow_id);
    let mut errors =
        records::check_selections(pool, selected_cow, None, "confirmed_by", valid.confirmed_by).await?;
    if let Some(ai_record_id) = valid.ai_record_id {
        if let Some(error) = check_ai_record(pool, ai_record_id, valid.cow_id, None).await? {
            errors.add("ai_record", error);
        }
    }
    if !errors.is_empty() {
        return Err(CreatePregnancyError::Validation(errors));
    }

    let now = Utc::now();
    let pregnancy = sqlx::query_as::<_, Pregnancy>(
        r#"
        INSERT INTO pregnancies (cow_id, ai_record_id, confirmation_date, confirmed_by,
                                 pregnancy_status, expected_delivery_date, actual_delivery_date,
                                 pregnancy_duration, calf_gender, calf_weight, delivery_type,
                                 complications, doctor_notes, recorded_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
    .bind(actor.user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_unique_violation(e, "ai_record", CreatePregnancyError::Validation, CreatePregnancyError::Database)
    })?;

    tracing::info!(pregnancy_id = pregnancy.id, cow_id = pregnancy.cow_id, "Pregnancy recorded");
    Ok(pregnancy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::{
        test_helpers::{actor, date, test_pool, TestAiRecord, TestCow, TestDoctor, TestUser},
        FieldError,
    };
    use herdbook_common::PregnancyStatus;

    fn form(doctor_id: i64) -> PregnancyForm {
        PregnancyForm {
            confirmation_date: "2024-05-01".to_string(),
            confirmed_by: doctor_id.to_string(),
            pregnancy_status: "confirmed".to_string(),
            expected_delivery_date: "2024-12-10".to_string(),
            ..PregnancyForm::default()
        }
    }

    #[tokio::test]
    async fn test_create_linked_to_ai_record() {
        let pool = test_pool().await;
        let user = TestUser::worker("ravi").insert(&pool).await.unwrap();
        let actor = actor(&pool, &user).await;
        let cow = TestCow::new("C-101").insert(&pool).await.unwrap();
        let doctor = TestDoctor::new("Dr. Joshi", "LIC-1").insert(&pool).await.unwrap();
        let ai = TestAiRecord::new(&cow).on(date(2024, 3, 2)).insert(&pool).await.unwrap();

        let mut command = form(doctor.id);
        command.ai_record = ai.id.to_string();
        let pregnancy = handle(&pool, &actor, Some(cow.id), command.clone()).await.unwrap();
        assert_eq!(pregnancy.cow_id, cow.id);
        assert_eq!(pregnancy.ai_record_id, Some(ai.id));
        assert_eq!(pregnancy.pregnancy_status, PregnancyStatus::Confirmed);
        assert_eq!(pregnancy.recorded_by, Some(user.id));

        match handle(&pool, &actor, Some(cow.id), command).await {
            Err(CreatePregnancyError::Validation(errors)) => {
                assert!(errors.has("ai_record", FieldError::AiRecordLinked))
            },
            other => panic!("expected linked AI record error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ai_record_of_another_cow_is_rejected() {
        let pool = test_pool().await;
        let user = TestUser::admin("boss").insert(&pool).await.unwrap();
        let actor = actor(&pool, &user).await;
        let gauri = TestCow::new("C-101").insert(&pool).await.unwrap();
        let kamdhenu = TestCow::new("C-102").insert(&pool).await.unwrap();
        let doctor = TestDoctor::new("Dr. Joshi", "LIC-1").insert(&pool).await.unwrap();
        let ai = TestAiRecord::new(&gauri).insert(&pool).await.unwrap();

        let mut command = form(doctor.id);
        command.cow = kamdhenu.id.to_string();
        command.ai_record = ai.id.to_string();
        match handle(&pool, &actor, None, command).await {
            Err(CreatePregnancyError::Validation(errors)) => {
                assert!(errors.has("ai_record", FieldError::AiRecordOtherCow))
            },
            other => panic!("expected other-cow error, got {:?}", other),
        }

        assert!(matches!(
            handle(&pool, &actor, Some(999), form(doctor.id)).await,
            Err(CreatePregnancyError::CowNotFound(999))
        ));
    }
}
