//! Pregnancy lists and lookups

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::Pregnancy;

const PREGNANCY_ROW_SELECT: &str = r#"
    SELECT p.*, c.cow_number, c.cow_name, d.name AS confirmed_by_name, ai.ai_date
    FROM pregnancies p
    JOIN cows c ON c.id = p.cow_id
    LEFT JOIN doctors d ON d.id = p.confirmed_by
    LEFT JOIN artificial_inseminations ai ON ai.id = p.ai_record_id
"#;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PregnancyListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub pregnancy: Pregnancy,
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub confirmed_by_name: Option<String>,
    /// Date of the linked AI record
    pub ai_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListPregnanciesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum GetPregnancyError {
    #[error("Pregnancy {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Newest confirmation first, optionally for one cow
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &SqlitePool,
    cow_id: Option<i64>,
) -> Result<Vec<PregnancyListItem>, ListPregnanciesError> {
    let filter = if cow_id.is_some() { "WHERE p.cow_id = ?" } else { "" };
    let sql = format!(
        "{} {} ORDER BY p.confirmation_date DESC, p.id DESC",
        PREGNANCY_ROW_SELECT, filter
    );

    let mut statement = sqlx::query_as::<_, PregnancyListItem>(&sql);
    if let Some(cow_id) = cow_id {
        statement = statement.bind(cow_id);
    }
    Ok(statement.fetch_all(pool).await?)
}

#[tracing::instrument(skip(pool))]
pub async fn get(pool: &SqlitePool, pregnancy_id: i64) -> Result<PregnancyListItem, GetPregnancyError> {
    let sql = format!("{} WHERE p.id = ?", PREGNANCY_ROW_SELECT);
    sqlx::query_as::<_, PregnancyListItem>(&sql)
        .bind(pregnancy_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetPregnancyError::NotFound(pregnancy_id))
}

/// The pregnancy that resulted from an AI record, if any
pub async fn for_ai_record(
    pool: &SqlitePool,
    ai_record_id: i64,
) -> Result<Option<PregnancyListItem>, sqlx::Error> {
    let sql = format!("{} WHERE p.ai_record_id = ?", PREGNANCY_ROW_SELECT);
    sqlx::query_as::<_, PregnancyListItem>(&sql)
        .bind(ai_record_id)
        .fetch_optional(pool)
        .await
}

pub async fn confirmed_count(pool: &SqlitePool) -> Result<i64, ListPregnanciesError> {
    let count = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pregnancies WHERE pregnancy_status = 'confirmed'",
    )
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{date, test_pool, TestAiRecord, TestCow};
    use chrono::NaiveDate;

    async fn insert(pool: &SqlitePool, cow_id: i64, ai_record_id: Option<i64>, confirmed: NaiveDate, status: &str) {
        sqlx::query(
            "INSERT INTO pregnancies (cow_id, ai_record_id, confirmation_date, pregnancy_status, \
             expected_delivery_date, created_at, updated_at) \
             VALUES (?, ?, ?, ?, '2025-01-10', '2024-05-01T00:00:00Z', '2024-05-01T00:00:00Z')",
        )
        .bind(cow_id)
        .bind(ai_record_id)
        .bind(confirmed)
        .bind(status)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_pregnancy_lists_and_counts() {
        let pool = test_pool().await;
        let gauri = TestCow::new("C-101").named("Gauri").insert(&pool).await.unwrap();
        let other = TestCow::new("C-102").insert(&pool).await.unwrap();
        let ai = TestAiRecord::new(&gauri).on(date(2024, 3, 2)).insert(&pool).await.unwrap();

        insert(&pool, gauri.id, Some(ai.id), date(2024, 5, 1), "confirmed").await;
        insert(&pool, other.id, None, date(2024, 6, 1), "suspected").await;
        insert(&pool, gauri.id, None, date(2023, 4, 1), "delivered").await;

        let all = handle(&pool, None).await.unwrap();
        let dates: Vec<_> = all.iter().map(|p| p.pregnancy.confirmation_date).collect();
        assert_eq!(dates, vec![date(2024, 6, 1), date(2024, 5, 1), date(2023, 4, 1)]);

        let gauri_only = handle(&pool, Some(gauri.id)).await.unwrap();
        assert_eq!(gauri_only.len(), 2);
        assert_eq!(gauri_only[0].ai_date, Some(date(2024, 3, 2)));
        assert_eq!(gauri_only[0].cow_name.as_deref(), Some("Gauri"));

        let linked = for_ai_record(&pool, ai.id).await.unwrap().unwrap();
        assert_eq!(linked.pregnancy.id, get(&pool, linked.pregnancy.id).await.unwrap().pregnancy.id);
        assert_eq!(confirmed_count(&pool).await.unwrap(), 1);
        assert!(matches!(get(&pool, 999).await, Err(GetPregnancyError::NotFound(999))));
    }
}
