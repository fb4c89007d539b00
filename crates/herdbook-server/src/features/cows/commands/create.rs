use chrono::Utc;
use sqlx::SqlitePool;

use super::form::CowForm;
use crate::{
    auth::Actor,
    features::shared::{error_helpers::map_unique_violation, FieldErrors},
    models::Cow,
};

#[derive(Debug, thiserror::Error)]
pub enum CreateCowError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command), fields(cow_number = %command.cow_number, added_by = actor.user_id))]
pub async fn handle(pool: &SqlitePool, actor: &Actor, command: CowForm) -> Result<Cow, CreateCowError> {
    let valid = command.validate().map_err(CreateCowError::Validation)?;

    let now = Utc::now();
    let cow = sqlx::query_as::<_, Cow>(
        r#"
        INSERT INTO cows (cow_number, cow_name, breed, age, color, identification_mark,
                          health_status, last_checkup, notes, photo, is_active, added_by,
                          created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
    .bind(valid.is_active.unwrap_or(true))
    .bind(actor.user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, "cow_number", CreateCowError::Validation, CreateCowError::Database))?;

    tracing::info!(cow_id = cow.id, "Cow added");
    Ok(cow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::{
        test_helpers::{actor, test_pool, TestCow, TestUser},
        FieldError,
    };

    fn form(cow_number: &str) -> CowForm {
        CowForm {
            cow_number: cow_number.to_string(),
            breed: "Sahiwal".to_string(),
            age: "3".to_string(),
            color: "Red".to_string(),
            identification_mark: "Notch in left ear".to_string(),
            is_active: None,
            ..CowForm::default()
        }
    }

    #[tokio::test]
    async fn test_create_cow_stamps_added_by() {
        let pool = test_pool().await;
        let admin = TestUser::admin("boss").insert(&pool).await.unwrap();
        let actor = actor(&pool, &admin).await;

        let cow = handle(&pool, &actor, form("C-201")).await.unwrap();
        assert_eq!(cow.added_by, Some(admin.id));
        assert!(cow.is_active);
        assert_eq!(cow.health_status, "Healthy");
        assert_eq!(cow.cow_name, None);
    }

    #[tokio::test]
    async fn test_cow_number_is_unique() {
        let pool = test_pool().await;
        let admin = TestUser::admin("boss").insert(&pool).await.unwrap();
        let actor = actor(&pool, &admin).await;
        TestCow::new("C-201").inactive().insert(&pool).await.unwrap();

        match handle(&pool, &actor, form("C-201")).await {
            Err(CreateCowError::Validation(errors)) => {
                assert!(errors.has("cow_number", FieldError::Duplicate))
            },
            other => panic!("expected duplicate cow number, got {:?}", other),
        }
    }
}
