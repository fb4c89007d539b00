use chrono::Utc;
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeactivateCowError {
    #[error("Cow {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Soft delete; the cow and its records stay reachable by id
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, cow_id: i64) -> Result<(), DeactivateCowError> {
    let result = sqlx::query("UPDATE cows SET is_active = 0, updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(cow_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeactivateCowError::NotFound(cow_id));
    }

    tracing::info!("Cow deactivated");
    Ok(())
}
