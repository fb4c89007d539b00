use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use herdbook_common::{CalfGender, PregnancyStatus, VisitType};
use serde::Serialize;
use sqlx::FromRow;

use super::Amount;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub qualification: String,
    pub specialization: Option<String>,
    pub license_number: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub added_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VeterinaryVisit {
    pub id: i64,
    pub cow_id: i64,
    pub doctor_id: Option<i64>,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub visit_type: VisitType,
    pub reason_for_visit: String,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_given: Option<String>,
    pub doctor_instructions: Option<String>,
    pub next_visit_date: Option<NaiveDate>,
    pub visit_cost: Option<Amount>,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Medication prescribed during a visit; removed with its visit
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Medicine {
    pub id: i64,
    pub visit_id: i64,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ArtificialInsemination {
    pub id: i64,
    pub cow_id: i64,
    pub doctor_id: Option<i64>,
    pub ai_date: NaiveDate,
    pub ai_time: NaiveTime,
    pub bull_breed: String,
    pub bull_id: Option<String>,
    pub semen_source: Option<String>,
    pub heat_detection_date: NaiveDate,
    pub technician_name: Option<String>,
    /// Free text; "Pending" until the outcome is known
    pub success_status: String,
    pub expected_calving_date: Option<NaiveDate>,
    pub cost: Option<Amount>,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Pregnancy {
    pub id: i64,
    pub cow_id: i64,
    pub ai_record_id: Option<i64>,
    pub confirmation_date: NaiveDate,
    pub confirmed_by: Option<i64>,
    pub pregnancy_status: PregnancyStatus,
    pub expected_delivery_date: NaiveDate,
    pub actual_delivery_date: Option<NaiveDate>,
    /// Days
    pub pregnancy_duration: Option<i64>,
    pub calf_gender: Option<CalfGender>,
    /// Kilograms
    pub calf_weight: Option<Amount>,
    pub delivery_type: Option<String>,
    pub complications: Option<String>,
    pub doctor_notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vaccination {
    pub id: i64,
    pub cow_id: i64,
    pub vaccine_name: String,
    pub disease_prevention: String,
    pub vaccination_date: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub administered_by: Option<i64>,
    pub dosage: String,
    pub route: String,
    pub notes: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}
