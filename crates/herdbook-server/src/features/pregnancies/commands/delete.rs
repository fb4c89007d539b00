use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeletePregnancyError {
    #[error("Pregnancy {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Hard delete; the linked AI record becomes available again
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, pregnancy_id: i64) -> Result<(), DeletePregnancyError> {
    let result = sqlx::query("DELETE FROM pregnancies WHERE id = ?")
        .bind(pregnancy_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeletePregnancyError::NotFound(pregnancy_id));
    }

    tracing::info!("Pregnancy deleted");
    Ok(())
}
