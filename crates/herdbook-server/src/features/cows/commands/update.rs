use chrono::Utc;
use sqlx::SqlitePool;

use super::form::CowForm;
use crate::{
    features::shared::{error_helpers::map_unique_violation, FieldErrors},
    models::Cow,
};

#[derive(Debug, thiserror::Error)]
pub enum UpdateCowError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Cow {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Full update; an absent `is_active` keeps the stored flag
#[tracing::instrument(skip(pool, command))]
pub async fn handle(pool: &SqlitePool, cow_id: i64, command: CowForm) -> Result<Cow, UpdateCowError> {
    let valid = command.validate().map_err(UpdateCowError::Validation)?;

    let cow = sqlx::query_as::<_, Cow>(
        r#"
        UPDATE cows
        SET cow_number = ?, cow_name = ?, breed = ?, age = ?, color = ?,
            identification_mark = ?, health_status = ?, last_checkup = ?, notes = ?,
            photo = ?, is_active = COALESCE(?, is_active), updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&valid.cow_number)
    .bind(&valid.cow_name)
    .bind(&valid.breed)
    .bind(valid.age)
    .bind(&valid.color)
    .bind(&valid.identification_mark)
    .bind(&valid.health_status)
    .bind(valid.last_checkup)
    .bind(&valid.notes)
    .bind(&valid.photo)
    .bind(valid.is_active)
    .bind(Utc::now())
    .bind(cow_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_unique_violation(e, "cow_number", UpdateCowError::Validation, UpdateCowError::Database))?
    .ok_or(UpdateCowError::NotFound(cow_id))?;

    tracing::info!("Cow updated");
    Ok(cow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::{
        test_helpers::{test_pool, TestCow},
        FieldError,
    };

    #[tokio::test]
    async fn test_update_cow() {
        let pool = test_pool().await;
        let cow = TestCow::new("C-101").named("Gauri").insert(&pool).await.unwrap();
        TestCow::new("C-102").insert(&pool).await.unwrap();

        let mut form = CowForm::from_cow(&cow);
        form.health_status = "Under treatment".to_string();
        form.is_active = None;
        let updated = handle(&pool, cow.id, form.clone()).await.unwrap();
        assert_eq!(updated.health_status, "Under treatment");
        assert!(updated.is_active);

        form.is_active = Some("false".to_string());
        assert!(!handle(&pool, cow.id, form.clone()).await.unwrap().is_active);

        form.cow_number = "C-102".to_string();
        match handle(&pool, cow.id, form.clone()).await {
            Err(UpdateCowError::Validation(errors)) => {
                assert!(errors.has("cow_number", FieldError::Duplicate))
            },
            other => panic!("expected duplicate cow number, got {:?}", other),
        }

        assert!(matches!(
            handle(&pool, 999, CowForm::from_cow(&cow)).await,
            Err(UpdateCowError::NotFound(999))
        ));
    }
}
