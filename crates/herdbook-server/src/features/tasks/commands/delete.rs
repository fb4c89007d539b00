use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeleteTaskError {
    #[error("Task {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Hard delete
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, task_id: i64) -> Result<(), DeleteTaskError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteTaskError::NotFound(task_id));
    }

    tracing::info!("Task deleted");
    Ok(())
}
