use serde::Serialize;
use sqlx::SqlitePool;

use super::list::{AiListItem, AI_ROW_SELECT};
use crate::features::pregnancies::queries::{list as pregnancies, PregnancyListItem};

/// An AI record and the pregnancy that followed it, if one was recorded
#[derive(Debug, Clone, Serialize)]
pub struct AiDetail {
    pub ai_record: AiListItem,
    pub pregnancy: Option<PregnancyListItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetAiRecordError {
    #[error("AI record {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, ai_record_id: i64) -> Result<AiDetail, GetAiRecordError> {
    let sql = format!("{} WHERE ai.id = ?", AI_ROW_SELECT);
    let ai_record = sqlx::query_as::<_, AiListItem>(&sql)
        .bind(ai_record_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetAiRecordError::NotFound(ai_record_id))?;

    let pregnancy = pregnancies::for_ai_record(pool, ai_record_id).await?;

    Ok(AiDetail {
        ai_record,
        pregnancy,
    })
}
