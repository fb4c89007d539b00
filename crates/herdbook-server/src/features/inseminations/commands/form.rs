use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    features::{
        inseminations::queries::PENDING_STATUS,
        shared::{FieldErrors, Validator},
    },
    models::Amount,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiForm {
    pub cow: String,
    pub doctor: String,
    pub ai_date: String,
    pub ai_time: String,
    pub bull_breed: String,
    pub bull_id: String,
    pub semen_source: String,
    pub heat_detection_date: String,
    pub technician_name: String,
    pub success_status: String,
    pub expected_calving_date: String,
    pub cost: String,
    pub notes: String,
}

impl Default for AiForm {
    fn default() -> Self {
        Self {
            cow: String::new(),
            doctor: String::new(),
            ai_date: String::new(),
            ai_time: String::new(),
            bull_breed: String::new(),
            bull_id: String::new(),
            semen_source: String::new(),
            heat_detection_date: String::new(),
            technician_name: String::new(),
            success_status: PENDING_STATUS.to_string(),
            expected_calving_date: String::new(),
            cost: String::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidAiRecord {
    pub cow_id: i64,
    pub doctor_id: i64,
    pub ai_date: NaiveDate,
    pub ai_time: NaiveTime,
    pub bull_breed: String,
    pub bull_id: Option<String>,
    pub semen_source: Option<String>,
    pub heat_detection_date: NaiveDate,
    pub technician_name: Option<String>,
    pub success_status: String,
    pub expected_calving_date: Option<NaiveDate>,
    pub cost: Option<Amount>,
    pub notes: Option<String>,
}

impl AiForm {
    /// Form for a cow picked in the URL
    pub fn for_cow(cow_id: i64) -> Self {
        Self {
            cow: cow_id.to_string(),
            ..Self::default()
        }
    }

    /// `path_cow` replaces the submitted `cow` field when set
    pub fn validate(&self, path_cow: Option<i64>) -> Result<ValidAiRecord, FieldErrors> {
        let mut v = Validator::new();
        let cow_id = match path_cow {
            Some(id) => id,
            None => v.required_id("cow", &self.cow),
        };
        let record = ValidAiRecord {
            cow_id,
            doctor_id: v.required_id("doctor", &self.doctor),
            ai_date: v.required_date("ai_date", &self.ai_date),
            ai_time: v.required_time("ai_time", &self.ai_time),
            bull_breed: v.required_text("bull_breed", &self.bull_breed, 100),
            bull_id: v.optional_text("bull_id", &self.bull_id, Some(100)),
            semen_source: v.optional_text("semen_source", &self.semen_source, Some(200)),
            heat_detection_date: v.required_date("heat_detection_date", &self.heat_detection_date),
            technician_name: v.optional_text("technician_name", &self.technician_name, Some(100)),
            success_status: v
                .optional_text("success_status", &self.success_status, Some(50))
                .unwrap_or_else(|| PENDING_STATUS.to_string()),
            expected_calving_date: v.optional_date("expected_calving_date", &self.expected_calving_date),
            cost: v.optional_amount("cost", &self.cost, 10, 2),
            notes: v.optional_text("notes", &self.notes, None),
        };
        v.finish(record)
    }
}
