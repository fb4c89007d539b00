use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Herd animal. Never hard-deleted; `is_active` is the soft-delete flag.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Cow {
    pub id: i64,
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub breed: String,
    /// Years
    pub age: i64,
    pub color: String,
    pub identification_mark: String,
    pub health_status: String,
    pub last_checkup: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Stored photo reference; upload handling lives outside the service
    pub photo: Option<String>,
    pub is_active: bool,
    pub added_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cow {
    /// "C-101 - Gauri", or "C-101 - Unnamed"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.cow_number, self.cow_name.as_deref().unwrap_or("Unnamed"))
    }
}
