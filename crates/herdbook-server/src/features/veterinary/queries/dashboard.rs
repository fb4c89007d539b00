//! Veterinary overview: doctors, recent visits, breeding and upcoming
//! vaccinations

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::features::{
    inseminations::queries::{list as ai_list, ListAiRecordsError},
    pregnancies::queries::{list as pregnancy_list, ListPregnanciesError},
    vaccinations::queries::{list as vaccination_list, ListVaccinationsError, VaccinationListItem},
    visits::queries::{list as visit_list, ListVisitsError, VisitListItem},
};

const RECENT_VISITS: i64 = 5;
const UPCOMING_VACCINATIONS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct VeterinaryDashboard {
    pub total_doctors: i64,
    pub recent_visits: Vec<VisitListItem>,
    pub pending_ai: i64,
    pub confirmed_pregnancies: i64,
    pub upcoming_vaccinations: Vec<VaccinationListItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum VeterinaryDashboardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: &SqlitePool,
    today: NaiveDate,
) -> Result<VeterinaryDashboard, VeterinaryDashboardError> {
    let total_doctors = sqlx::query_scalar("SELECT COUNT(*) FROM doctors WHERE is_active = 1")
        .fetch_one(pool)
        .await?;

    Ok(VeterinaryDashboard {
        total_doctors,
        recent_visits: visit_list::recent(pool, RECENT_VISITS).await?,
        pending_ai: ai_list::pending_count(pool).await?,
        confirmed_pregnancies: pregnancy_list::confirmed_count(pool).await?,
        upcoming_vaccinations: vaccination_list::upcoming(pool, today, UPCOMING_VACCINATIONS).await?,
    })
}

impl From<ListVisitsError> for VeterinaryDashboardError {
    fn from(err: ListVisitsError) -> Self {
        match err {
            ListVisitsError::Database(e) => VeterinaryDashboardError::Database(e),
        }
    }
}

impl From<ListAiRecordsError> for VeterinaryDashboardError {
    fn from(err: ListAiRecordsError) -> Self {
        match err {
            ListAiRecordsError::Database(e) => VeterinaryDashboardError::Database(e),
        }
    }
}

impl From<ListPregnanciesError> for VeterinaryDashboardError {
    fn from(err: ListPregnanciesError) -> Self {
        match err {
            ListPregnanciesError::Database(e) => VeterinaryDashboardError::Database(e),
        }
    }
}

impl From<ListVaccinationsError> for VeterinaryDashboardError {
    fn from(err: ListVaccinationsError) -> Self {
        match err {
            ListVaccinationsError::Database(e) => VeterinaryDashboardError::Database(e),
        }
    }
}
