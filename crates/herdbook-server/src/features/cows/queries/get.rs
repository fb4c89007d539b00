//! Cow detail with every veterinary record kept for it
//!
//! Inactive cows resolve too; only the lists hide them.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    features::{
        inseminations::queries::{list as ai_list, AiListItem, ListAiRecordsError},
        pregnancies::queries::{list as pregnancy_list, ListPregnanciesError, PregnancyListItem},
        vaccinations::queries::{list as vaccination_list, ListVaccinationsError, VaccinationListItem},
        visits::queries::{list as visit_list, ListVisitsError, VisitListItem},
    },
    models::Cow,
};

#[derive(Debug, Clone, Serialize)]
pub struct CowDetail {
    pub cow: Cow,
    pub visits: Vec<VisitListItem>,
    pub ai_records: Vec<AiListItem>,
    pub pregnancies: Vec<PregnancyListItem>,
    pub vaccinations: Vec<VaccinationListItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCowError {
    #[error("Cow {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The cow row alone
pub async fn find(pool: &SqlitePool, cow_id: i64) -> Result<Cow, GetCowError> {
    sqlx::query_as::<_, Cow>("SELECT * FROM cows WHERE id = ?")
        .bind(cow_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetCowError::NotFound(cow_id))
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, cow_id: i64) -> Result<CowDetail, GetCowError> {
    let cow = find(pool, cow_id).await?;

    Ok(CowDetail {
        visits: visit_list::for_cow(pool, cow_id).await?,
        ai_records: ai_list::handle(pool, Some(cow_id)).await?,
        pregnancies: pregnancy_list::handle(pool, Some(cow_id)).await?,
        vaccinations: vaccination_list::handle(pool, Some(cow_id)).await?,
        cow,
    })
}

impl From<ListVisitsError> for GetCowError {
    fn from(err: ListVisitsError) -> Self {
        match err {
            ListVisitsError::Database(e) => GetCowError::Database(e),
        }
    }
}

impl From<ListAiRecordsError> for GetCowError {
    fn from(err: ListAiRecordsError) -> Self {
        match err {
            ListAiRecordsError::Database(e) => GetCowError::Database(e),
        }
    }
}

impl From<ListPregnanciesError> for GetCowError {
    fn from(err: ListPregnanciesError) -> Self {
        match err {
            ListPregnanciesError::Database(e) => GetCowError::Database(e),
        }
    }
}

impl From<ListVaccinationsError> for GetCowError {
    fn from(err: ListVaccinationsError) -> Self {
        match err {
            ListVaccinationsError::Database(e) => GetCowError::Database(e),
        }
    }
}
