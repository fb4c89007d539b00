//! Task lists
//!
//! Admins see every task, workers only the tasks assigned to them. Newest
//! first. The overdue flag is computed against the time of the query.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::Task;

/// Columns of a task joined with its assignee and assigner
pub(crate) const TASK_ROW_SELECT: &str = r#"
    SELECT t.*,
           w.employee_id,
           w.user_id AS worker_user_id,
           CASE WHEN trim(u.first_name || ' ' || u.last_name) = ''
                THEN u.username
                ELSE trim(u.first_name || ' ' || u.last_name)
           END AS worker_name,
           ab.username AS assigned_by_username
    FROM tasks t
    JOIN workers w ON w.id = t.assigned_to
    JOIN users u ON u.id = w.user_id
    LEFT JOIN users ab ON ab.id = t.assigned_by
"#;

/// A task with the names needed to display it
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaskListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub worker_name: String,
    pub employee_id: String,
    /// User id of the assignee, for ownership checks
    #[serde(skip)]
    pub worker_user_id: i64,
    pub assigned_by_username: Option<String>,
    #[sqlx(skip)]
    pub is_overdue: bool,
}

impl TaskListItem {
    pub(crate) fn mark_overdue(mut self, now: DateTime<Utc>) -> Self {
        self.is_overdue = self.task.is_overdue(now);
        self
    }
}

/// Whose tasks to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    All,
    /// Tasks assigned to one worker profile
    Worker(i64),
}

#[derive(Debug, Clone, Copy)]
pub struct ListTasksQuery {
    pub scope: TaskScope,
    pub limit: Option<i64>,
}

impl ListTasksQuery {
    pub fn all() -> Self {
        Self {
            scope: TaskScope::All,
            limit: None,
        }
    }

    pub fn for_worker(worker_id: i64) -> Self {
        Self {
            scope: TaskScope::Worker(worker_id),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListTasksError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &SqlitePool,
    query: ListTasksQuery,
    now: DateTime<Utc>,
) -> Result<Vec<TaskListItem>, ListTasksError> {
    let filter = match query.scope {
        TaskScope::All => "",
        TaskScope::Worker(_) => "WHERE t.assigned_to = ?",
    };
    let sql = format!(
        "{} {} ORDER BY t.created_at DESC, t.id DESC LIMIT ?",
        TASK_ROW_SELECT, filter
    );

    let mut statement = sqlx::query_as::<_, TaskListItem>(&sql);
    if let TaskScope::Worker(worker_id) = query.scope {
        statement = statement.bind(worker_id);
    }
    let rows = statement
        .bind(query.limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| row.mark_overdue(now)).collect())
}
