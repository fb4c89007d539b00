use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeleteAiRecordError {
    #[error("AI record {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Hard delete; a pregnancy that linked the record keeps its row and loses
/// the link
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, ai_record_id: i64) -> Result<(), DeleteAiRecordError> {
    let result = sqlx::query("DELETE FROM artificial_inseminations WHERE id = ?")
        .bind(ai_record_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteAiRecordError::NotFound(ai_record_id));
    }

    tracing::info!("AI record deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{date, test_pool, TestAiRecord, TestCow};

    #[tokio::test]
    async fn test_delete_unlinks_pregnancy() {
        let pool = test_pool().await;
        let cow = TestCow::new("C-101").insert(&pool).await.unwrap();
        let ai = TestAiRecord::new(&cow).on(date(2024, 3, 2)).insert(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO pregnancies (cow_id, ai_record_id, confirmation_date, pregnancy_status, \
             expected_delivery_date, created_at, updated_at) \
             VALUES (?, ?, '2024-05-01', 'confirmed', '2024-12-10', '2024-05-01T00:00:00Z', '2024-05-01T00:00:00Z')",
        )
        .bind(cow.id)
        .bind(ai.id)
        .execute(&pool)
        .await
        .unwrap();

        handle(&pool, ai.id).await.unwrap();

        let link: Option<i64> = sqlx::query_scalar("SELECT ai_record_id FROM pregnancies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(link, None);
        assert!(matches!(handle(&pool, ai.id).await, Err(DeleteAiRecordError::NotFound(_))));
    }
}
