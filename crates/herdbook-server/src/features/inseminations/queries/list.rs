//! AI record lists

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::ArtificialInsemination;

pub(crate) const AI_ROW_SELECT: &str = r#"
    SELECT ai.*, c.cow_number, c.cow_name, d.name AS doctor_name
    FROM artificial_inseminations ai
    JOIN cows c ON c.id = ai.cow_id
    LEFT JOIN doctors d ON d.id = ai.doctor_id
"#;

/// Outcome recorded on a fresh AI record
pub const PENDING_STATUS: &str = "Pending";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AiListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: ArtificialInsemination,
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub doctor_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListAiRecordsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Newest AI date first, optionally for one cow
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &SqlitePool,
    cow_id: Option<i64>,
) -> Result<Vec<AiListItem>, ListAiRecordsError> {
    let filter = if cow_id.is_some() { "WHERE ai.cow_id = ?" } else { "" };
    let sql = format!("{} {} ORDER BY ai.ai_date DESC, ai.id DESC", AI_ROW_SELECT, filter);

    let mut statement = sqlx::query_as::<_, AiListItem>(&sql);
    if let Some(cow_id) = cow_id {
        statement = statement.bind(cow_id);
    }
    Ok(statement.fetch_all(pool).await?)
}

/// AI records still waiting for an outcome
pub async fn pending_count(pool: &SqlitePool) -> Result<i64, ListAiRecordsError> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM artificial_inseminations WHERE success_status = ?",
    )
    .bind(PENDING_STATUS)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{date, test_pool, TestAiRecord, TestCow};

    #[tokio::test]
    async fn test_list_and_pending_count() {
        let pool = test_pool().await;
        let gauri = TestCow::new("C-101").named("Gauri").insert(&pool).await.unwrap();
        let tara = TestCow::new("C-102").insert(&pool).await.unwrap();

        let first = TestAiRecord::new(&gauri).on(date(2024, 1, 10)).status("Successful").insert(&pool).await.unwrap();
        let second = TestAiRecord::new(&gauri).on(date(2024, 3, 2)).insert(&pool).await.unwrap();
        let other = TestAiRecord::new(&tara).on(date(2024, 2, 15)).insert(&pool).await.unwrap();

        let all: Vec<_> = handle(&pool, None).await.unwrap().iter().map(|r| r.record.id).collect();
        assert_eq!(all, vec![second.id, other.id, first.id]);

        let gauri_only = handle(&pool, Some(gauri.id)).await.unwrap();
        assert_eq!(gauri_only.len(), 2);
        assert_eq!(gauri_only[0].cow_name.as_deref(), Some("Gauri"));

        assert_eq!(pending_count(&pool).await.unwrap(), 2);
    }
}
