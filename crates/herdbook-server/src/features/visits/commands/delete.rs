use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeleteVisitError {
    #[error("Visit {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Hard delete; medicines go with the visit. Returns the cow id.
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, visit_id: i64) -> Result<i64, DeleteVisitError> {
    let cow_id: i64 = sqlx::query_scalar("DELETE FROM veterinary_visits WHERE id = ? RETURNING cow_id")
        .bind(visit_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DeleteVisitError::NotFound(visit_id))?;

    tracing::info!(cow_id, "Visit deleted");
    Ok(cow_id)
}
