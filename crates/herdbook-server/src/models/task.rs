use chrono::{DateTime, Utc};
use herdbook_common::TaskStatus;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub assigned_to: i64,
    pub assigned_by: Option<i64>,
    pub notes: Option<String>,
    pub deadline: DateTime<Utc>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Deadline has passed and the task is not completed.
    ///
    /// Computed on display only; the stored status is never rewritten.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        is_overdue(self.status, self.deadline, now)
    }
}

pub(crate) fn is_overdue(status: TaskStatus, deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    !status.is_completed() && deadline < now
}
