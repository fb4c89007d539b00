//! Worker profiles joined with their user accounts

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::Worker;

const WORKER_ROW_SELECT: &str = r#"
    SELECT w.*,
           u.username,
           CASE WHEN trim(u.first_name || ' ' || u.last_name) = ''
                THEN u.username
                ELSE trim(u.first_name || ' ' || u.last_name)
           END AS full_name,
           u.email,
           u.phone_number
    FROM workers w
    JOIN users u ON u.id = w.user_id
"#;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkerListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub worker: Worker,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListWorkersError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum GetWorkerError {
    #[error("Worker {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Active workers by employee id
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool) -> Result<Vec<WorkerListItem>, ListWorkersError> {
    let sql = format!("{} WHERE w.is_active = 1 ORDER BY w.employee_id", WORKER_ROW_SELECT);
    let workers = sqlx::query_as::<_, WorkerListItem>(&sql).fetch_all(pool).await?;
    Ok(workers)
}

/// One worker, active or not
#[tracing::instrument(skip(pool))]
pub async fn get(pool: &SqlitePool, worker_id: i64) -> Result<WorkerListItem, GetWorkerError> {
    let sql = format!("{} WHERE w.id = ?", WORKER_ROW_SELECT);
    sqlx::query_as::<_, WorkerListItem>(&sql)
        .bind(worker_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetWorkerError::NotFound(worker_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_pool, TestUser, TestWorker};

    #[tokio::test]
    async fn test_list_excludes_inactive_workers() {
        let pool = test_pool().await;
        let ravi = TestUser::worker("ravi").named("Ravi", "Patil").insert(&pool).await.unwrap();
        TestWorker::new(&ravi, "W200").insert(&pool).await.unwrap();
        let anil = TestUser::worker("anil").insert(&pool).await.unwrap();
        TestWorker::new(&anil, "W100").insert(&pool).await.unwrap();
        let gone = TestUser::worker("gone").insert(&pool).await.unwrap();
        let gone = TestWorker::new(&gone, "W050").inactive().insert(&pool).await.unwrap();

        let workers = handle(&pool).await.unwrap();
        let ids: Vec<_> = workers.iter().map(|w| w.worker.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["W100", "W200"]);
        assert_eq!(workers[0].full_name, "anil");
        assert_eq!(workers[1].full_name, "Ravi Patil");

        let inactive = get(&pool, gone.id).await.unwrap();
        assert!(!inactive.worker.is_active);
        assert!(matches!(get(&pool, 999).await, Err(GetWorkerError::NotFound(999))));
    }
}
