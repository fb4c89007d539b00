//! Vaccination lists

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::models::Vaccination;

const VACCINATION_ROW_SELECT: &str = r#"
    SELECT v.*, c.cow_number, c.cow_name, d.name AS administered_by_name
    FROM vaccinations v
    JOIN cows c ON c.id = v.cow_id
    LEFT JOIN doctors d ON d.id = v.administered_by
"#;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VaccinationListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub vaccination: Vaccination,
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub administered_by_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListVaccinationsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum GetVaccinationError {
    #[error("Vaccination {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Newest vaccination first, optionally for one cow
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &SqlitePool,
    cow_id: Option<i64>,
) -> Result<Vec<VaccinationListItem>, ListVaccinationsError> {
    let filter = if cow_id.is_some() { "WHERE v.cow_id = ?" } else { "" };
    let sql = format!(
        "{} {} ORDER BY v.vaccination_date DESC, v.id DESC",
        VACCINATION_ROW_SELECT, filter
    );

    let mut statement = sqlx::query_as::<_, VaccinationListItem>(&sql);
    if let Some(cow_id) = cow_id {
        statement = statement.bind(cow_id);
    }
    Ok(statement.fetch_all(pool).await?)
}

/// Vaccinations due on or after `today`, soonest first
#[tracing::instrument(skip(pool))]
pub async fn upcoming(
    pool: &SqlitePool,
    today: NaiveDate,
    limit: i64,
) -> Result<Vec<VaccinationListItem>, ListVaccinationsError> {
    let sql = format!(
        "{} WHERE v.next_due_date >= ? ORDER BY v.next_due_date, v.id LIMIT ?",
        VACCINATION_ROW_SELECT
    );
    let vaccinations = sqlx::query_as::<_, VaccinationListItem>(&sql)
        .bind(today)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(vaccinations)
}

#[tracing::instrument(skip(pool))]
pub async fn get(
    pool: &SqlitePool,
    vaccination_id: i64,
) -> Result<VaccinationListItem, GetVaccinationError> {
    let sql = format!("{} WHERE v.id = ?", VACCINATION_ROW_SELECT);
    sqlx::query_as::<_, VaccinationListItem>(&sql)
        .bind(vaccination_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetVaccinationError::NotFound(vaccination_id))
}
