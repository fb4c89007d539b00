use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeleteVaccinationError {
    #[error("Vaccination {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, vaccination_id: i64) -> Result<(), DeleteVaccinationError> {
    let result = sqlx::query("DELETE FROM vaccinations WHERE id = ?")
        .bind(vaccination_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteVaccinationError::NotFound(vaccination_id));
    }

    tracing::info!("Vaccination deleted");
    Ok(())
}
