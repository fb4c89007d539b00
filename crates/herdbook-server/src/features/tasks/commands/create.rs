//! Assign a new task to a worker

use chrono::Utc;
use sqlx::SqlitePool;

use super::form::{assignee_is_valid, completion_timestamp, invalid_assignee, TaskForm};
use crate::{auth::Actor, features::shared::FieldErrors, models::Task};

#[derive(Debug, thiserror::Error)]
pub enum CreateTaskError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a task stamped with the acting admin as `assigned_by`
#[tracing::instrument(skip(pool, command), fields(assigned_by = actor.user_id, title = %command.title))]
pub async fn handle(
    pool: &SqlitePool,
    actor: &Actor,
    command: TaskForm,
) -> Result<Task, CreateTaskError> {
    let valid = command.validate().map_err(CreateTaskError::Validation)?;

    if !assignee_is_valid(pool, valid.assigned_to, None).await? {
        return Err(CreateTaskError::Validation(invalid_assignee()));
    }

    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (title, description, assigned_to, assigned_by, notes, deadline, status,
                           created_at, updated_at, completed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&valid.title)
    .bind(&valid.description)
    .bind(valid.assigned_to)
    .bind(actor.user_id)
    .bind(&valid.notes)
    .bind(valid.deadline)
    .bind(valid.status)
    .bind(now)
    .bind(now)
    .bind(completion_timestamp(None, valid.status, now))
    .fetch_one(pool)
    .await?;

    tracing::info!(task_id = task.id, assigned_to = task.assigned_to, "Task assigned");
    Ok(task)
}
