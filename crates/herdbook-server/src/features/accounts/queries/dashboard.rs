//! Landing page after login
//!
//! Admins get farm-wide counts, workers get counts of their own tasks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::{
    features::{
        cows::queries::{list as cow_list, ListCowsError},
        tasks::queries::{list, ListTasksError, ListTasksQuery, TaskListItem},
    },
    models::Cow,
};

const ADMIN_RECENT_TASKS: i64 = 5;
const ADMIN_RECENT_COWS: i64 = 5;
const WORKER_RECENT_TASKS: i64 = 10;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminCounts {
    pub total_workers: i64,
    pub total_tasks: i64,
    pub pending_tasks: i64,
    pub total_cows: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    #[serde(flatten)]
    pub counts: AdminCounts,
    pub recent_tasks: Vec<TaskListItem>,
    pub recent_cows: Vec<Cow>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkerCounts {
    pub pending_tasks: i64,
    pub in_progress_tasks: i64,
    pub completed_tasks: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerDashboard {
    #[serde(flatten)]
    pub counts: WorkerCounts,
    pub recent_tasks: Vec<TaskListItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ListTasksError> for DashboardError {
    fn from(err: ListTasksError) -> Self {
        match err {
            ListTasksError::Database(e) => DashboardError::Database(e),
        }
    }
}

impl From<ListCowsError> for DashboardError {
    fn from(err: ListCowsError) -> Self {
        match err {
            ListCowsError::Database(e) => DashboardError::Database(e),
        }
    }
}

#[tracing::instrument(skip(pool))]
pub async fn admin(pool: &SqlitePool, now: DateTime<Utc>) -> Result<AdminDashboard, DashboardError> {
    let counts = sqlx::query_as::<_, AdminCounts>(
        r#"
        SELECT (SELECT COUNT(*) FROM workers WHERE is_active = 1) AS total_workers,
               (SELECT COUNT(*) FROM tasks) AS total_tasks,
               (SELECT COUNT(*) FROM tasks WHERE status = 'pending') AS pending_tasks,
               (SELECT COUNT(*) FROM cows WHERE is_active = 1) AS total_cows
        "#,
    )
    .fetch_one(pool)
    .await?;

    let recent_tasks = list::handle(pool, ListTasksQuery::all().limit(ADMIN_RECENT_TASKS), now).await?;

    let recent_cows = cow_list::first(pool, ADMIN_RECENT_COWS).await?;

    Ok(AdminDashboard {
        counts,
        recent_tasks,
        recent_cows,
    })
}

#[tracing::instrument(skip(pool))]
pub async fn worker(
    pool: &SqlitePool,
    worker_id: i64,
    now: DateTime<Utc>,
) -> Result<WorkerDashboard, DashboardError> {
    let counts = sqlx::query_as::<_, WorkerCounts>(
        r#"
        SELECT COALESCE(SUM(status = 'pending'), 0) AS pending_tasks,
               COALESCE(SUM(status = 'in_progress'), 0) AS in_progress_tasks,
               COALESCE(SUM(status = 'completed'), 0) AS completed_tasks
        FROM tasks
        WHERE assigned_to = ?
        "#,
    )
    .bind(worker_id)
    .fetch_one(pool)
    .await?;

    let recent_tasks = list::handle(
        pool,
        ListTasksQuery::for_worker(worker_id).limit(WORKER_RECENT_TASKS),
        now,
    )
    .await?;

    Ok(WorkerDashboard {
        counts,
        recent_tasks,
    })
}
