//! Visit rows with the cow and doctor names needed to display them

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::VeterinaryVisit;

pub(crate) const VISIT_ROW_SELECT: &str = r#"
    SELECT v.*, c.cow_number, c.cow_name, d.name AS doctor_name
    FROM veterinary_visits v
    JOIN cows c ON c.id = v.cow_id
    LEFT JOIN doctors d ON d.id = v.doctor_id
"#;

const NEWEST_FIRST: &str = "ORDER BY v.visit_date DESC, v.visit_time DESC, v.id DESC";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VisitListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub visit: VeterinaryVisit,
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub doctor_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListVisitsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Every visit of one cow, newest first
#[tracing::instrument(skip(pool))]
pub async fn for_cow(pool: &SqlitePool, cow_id: i64) -> Result<Vec<VisitListItem>, ListVisitsError> {
    let sql = format!("{} WHERE v.cow_id = ? {}", VISIT_ROW_SELECT, NEWEST_FIRST);
    let visits = sqlx::query_as::<_, VisitListItem>(&sql)
        .bind(cow_id)
        .fetch_all(pool)
        .await?;
    Ok(visits)
}

/// Latest visits across the herd
#[tracing::instrument(skip(pool))]
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<VisitListItem>, ListVisitsError> {
    let sql = format!("{} {} LIMIT ?", VISIT_ROW_SELECT, NEWEST_FIRST);
    let visits = sqlx::query_as::<_, VisitListItem>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(visits)
}
