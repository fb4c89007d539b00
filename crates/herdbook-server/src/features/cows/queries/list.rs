use sqlx::SqlitePool;

use crate::models::Cow;

#[derive(Debug, thiserror::Error)]
pub enum ListCowsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Active cows by cow number
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool) -> Result<Vec<Cow>, ListCowsError> {
    let cows = sqlx::query_as::<_, Cow>("SELECT * FROM cows WHERE is_active = 1 ORDER BY cow_number")
        .fetch_all(pool)
        .await?;
    Ok(cows)
}

/// First `limit` active cows by cow number
pub async fn first(pool: &SqlitePool, limit: i64) -> Result<Vec<Cow>, ListCowsError> {
    let cows = sqlx::query_as::<_, Cow>(
        "SELECT * FROM cows WHERE is_active = 1 ORDER BY cow_number LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(cows)
}
