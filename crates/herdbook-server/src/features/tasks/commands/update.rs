//! Task updates
//!
//! Admins edit the whole task; workers may only move the status of tasks
//! assigned to them. Both paths share the completion stamping rule.

use chrono::{DateTime, Utc};
use herdbook_common::TaskStatus;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::form::{assignee_is_valid, completion_timestamp, invalid_assignee, TaskForm};
use crate::{
    features::shared::{FieldErrors, Validator},
    models::Task,
};

#[derive(Debug, thiserror::Error)]
pub enum UpdateTaskError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Task {0} not found")]
    NotFound(i64),

    #[error("Task {task_id} is not assigned to worker {worker_id}")]
    NotAssignee { task_id: i64, worker_id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Worker status form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTaskStatusCommand {
    pub status: String,
}

impl UpdateTaskStatusCommand {
    pub fn validate(&self) -> Result<TaskStatus, FieldErrors> {
        let mut v = Validator::new();
        let status = v.choice("status", &self.status);
        v.finish(status)
    }
}

#[derive(Debug, FromRow)]
struct CurrentState {
    assigned_to: i64,
    status: TaskStatus,
    completed_at: Option<DateTime<Utc>>,
}

async fn current_state(pool: &SqlitePool, task_id: i64) -> Result<CurrentState, UpdateTaskError> {
    sqlx::query_as::<_, CurrentState>(
        "SELECT assigned_to, status, completed_at FROM tasks WHERE id = ?",
    )
    .bind(task_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UpdateTaskError::NotFound(task_id))
}

/// Admin: replace every editable field
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: &SqlitePool,
    task_id: i64,
    command: TaskForm,
) -> Result<Task, UpdateTaskError> {
    let current = current_state(pool, task_id).await?;
    let valid = command.validate().map_err(UpdateTaskError::Validation)?;

    if !assignee_is_valid(pool, valid.assigned_to, Some(current.assigned_to)).await? {
        return Err(UpdateTaskError::Validation(invalid_assignee()));
    }

    let now = Utc::now();
    let completed_at =
        completion_timestamp(Some((current.status, current.completed_at)), valid.status, now);

    let task = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks
        SET title = ?, description = ?, assigned_to = ?, notes = ?, deadline = ?, status = ?,
            completed_at = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&valid.title)
    .bind(&valid.description)
    .bind(valid.assigned_to)
    .bind(&valid.notes)
    .bind(valid.deadline)
    .bind(valid.status)
    .bind(completed_at)
    .bind(now)
    .bind(task_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UpdateTaskError::NotFound(task_id))?;

    tracing::info!(status = %task.status, "Task updated");
    Ok(task)
}

/// Worker: change the status of one of their own tasks
#[tracing::instrument(skip(pool, command))]
pub async fn handle_status(
    pool: &SqlitePool,
    task_id: i64,
    worker_id: i64,
    command: UpdateTaskStatusCommand,
) -> Result<Task, UpdateTaskError> {
    let current = current_state(pool, task_id).await?;
    if current.assigned_to != worker_id {
        return Err(UpdateTaskError::NotAssignee { task_id, worker_id });
    }

    let status = command.validate().map_err(UpdateTaskError::Validation)?;
    let now = Utc::now();
    let completed_at =
        completion_timestamp(Some((current.status, current.completed_at)), status, now);

    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET status = ?, completed_at = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(status)
    .bind(completed_at)
    .bind(now)
    .bind(task_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UpdateTaskError::NotFound(task_id))?;

    tracing::info!(status = %task.status, "Task status updated");
    Ok(task)
}
