//! Admin task form, shared by create and update

use chrono::{DateTime, Utc};
use herdbook_common::TaskStatus;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    features::shared::{choices, FieldError, FieldErrors, Validator},
    models::Task,
};

/// `datetime-local` format of the deadline field
pub const DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Worker profile id
    pub assigned_to: String,
    pub notes: String,
    pub deadline: String,
    pub status: String,
}

/// A task form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTask {
    pub title: String,
    pub description: String,
    pub assigned_to: i64,
    pub notes: Option<String>,
    pub deadline: DateTime<Utc>,
    pub status: TaskStatus,
}

impl TaskForm {
    /// Blank form with the status preselected
    pub fn initial() -> Self {
        Self {
            status: TaskStatus::default().as_str().to_string(),
            ..Self::default()
        }
    }

    /// Form pre-filled from a stored task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            assigned_to: task.assigned_to.to_string(),
            notes: task.notes.clone().unwrap_or_default(),
            deadline: task.deadline.format(DEADLINE_FORMAT).to_string(),
            status: task.status.as_str().to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidTask, FieldErrors> {
        let mut v = Validator::new();
        let task = ValidTask {
            title: v.required_text("title", &self.title, 200),
            description: v.required_long_text("description", &self.description),
            assigned_to: v.required_id("assigned_to", &self.assigned_to),
            notes: v.optional_text("notes", &self.notes, None),
            deadline: v.required_datetime("deadline", &self.deadline),
            status: v.choice("status", &self.status),
        };
        v.finish(task)
    }
}

/// `completed_at` after a status change
///
/// Set when the task enters `completed`, kept while it stays there, cleared
/// when it leaves.
pub(crate) fn completion_timestamp(
    previous: Option<(TaskStatus, Option<DateTime<Utc>>)>,
    next: TaskStatus,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if !next.is_completed() {
        return None;
    }
    match previous {
        Some((status, completed_at)) if status.is_completed() => completed_at.or(Some(now)),
        _ => Some(now),
    }
}

pub(crate) fn invalid_assignee() -> FieldErrors {
    FieldErrors::single("assigned_to", FieldError::InvalidChoice)
}

/// Assignee must be an active worker, or the task's current assignee
pub(crate) async fn assignee_is_valid(
    pool: &SqlitePool,
    assigned_to: i64,
    current: Option<i64>,
) -> Result<bool, sqlx::Error> {
    if current == Some(assigned_to) {
        return Ok(true);
    }
    choices::worker_is_active(pool, assigned_to).await
}
