use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeactivateWorkerError {
    #[error("Worker {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Soft delete: the profile and its tasks stay, the worker drops out of lists
/// and assignee choices
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, worker_id: i64) -> Result<(), DeactivateWorkerError> {
    let result = sqlx::query("UPDATE workers SET is_active = 0 WHERE id = ?")
        .bind(worker_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeactivateWorkerError::NotFound(worker_id));
    }

    tracing::info!("Worker deactivated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::{
        choices,
        test_helpers::{test_pool, TestTask, TestUser, TestWorker},
    };

    #[tokio::test]
    async fn test_deactivate_keeps_row_and_tasks() {
        let pool = test_pool().await;
        let user = TestUser::worker("ravi").insert(&pool).await.unwrap();
        let worker = TestWorker::new(&user, "W100").insert(&pool).await.unwrap();
        TestTask::new(&worker, "Milk cows").insert(&pool).await.unwrap();

        handle(&pool, worker.id).await.unwrap();

        assert!(!choices::worker_is_active(&pool, worker.id).await.unwrap());
        let tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE assigned_to = ?")
            .bind(worker.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(tasks, 1);

        assert!(matches!(
            handle(&pool, 999).await,
            Err(DeactivateWorkerError::NotFound(999))
        ));
    }
}
