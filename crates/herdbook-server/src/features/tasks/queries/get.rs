use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::list::{TaskListItem, TASK_ROW_SELECT};

#[derive(Debug, thiserror::Error)]
pub enum GetTaskError {
    #[error("Task {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Task by id, with assignee details
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &SqlitePool,
    task_id: i64,
    now: DateTime<Utc>,
) -> Result<TaskListItem, GetTaskError> {
    let sql = format!("{} WHERE t.id = ?", TASK_ROW_SELECT);
    sqlx::query_as::<_, TaskListItem>(&sql)
        .bind(task_id)
        .fetch_optional(pool)
        .await?
        .map(|row| row.mark_overdue(now))
        .ok_or(GetTaskError::NotFound(task_id))
}
