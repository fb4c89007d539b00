use serde::Serialize;
use sqlx::SqlitePool;

use super::list::{VisitListItem, VISIT_ROW_SELECT};
use crate::models::Medicine;

/// A visit and the medicines prescribed during it
#[derive(Debug, Clone, Serialize)]
pub struct VisitDetail {
    pub visit: VisitListItem,
    pub medicines: Vec<Medicine>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetVisitError {
    #[error("Visit {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, visit_id: i64) -> Result<VisitDetail, GetVisitError> {
    let sql = format!("{} WHERE v.id = ?", VISIT_ROW_SELECT);
    let visit = sqlx::query_as::<_, VisitListItem>(&sql)
        .bind(visit_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetVisitError::NotFound(visit_id))?;

    let medicines = sqlx::query_as::<_, Medicine>(
        "SELECT * FROM medicines WHERE visit_id = ? ORDER BY start_date, id",
    )
    .bind(visit_id)
    .fetch_all(pool)
    .await?;

    Ok(VisitDetail { visit, medicines })
}
