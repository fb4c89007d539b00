//! Cow form, shared by create and update

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    features::shared::{checkbox, FieldErrors, Validator},
    models::Cow,
};

pub const DEFAULT_HEALTH_STATUS: &str = "Healthy";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CowForm {
    pub cow_number: String,
    pub cow_name: String,
    pub breed: String,
    pub age: String,
    pub color: String,
    pub identification_mark: String,
    pub health_status: String,
    pub last_checkup: String,
    pub notes: String,
    pub photo: String,
    /// Checkbox; absent when unticked or not rendered
    #[serde(default)]
    pub is_active: Option<String>,
}

impl Default for CowForm {
    fn default() -> Self {
        Self {
            cow_number: String::new(),
            cow_name: String::new(),
            breed: String::new(),
            age: String::new(),
            color: String::new(),
            identification_mark: String::new(),
            health_status: DEFAULT_HEALTH_STATUS.to_string(),
            last_checkup: String::new(),
            notes: String::new(),
            photo: String::new(),
            is_active: Some("on".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidCow {
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub breed: String,
    pub age: i64,
    pub color: String,
    pub identification_mark: String,
    pub health_status: String,
    pub last_checkup: Option<NaiveDate>,
    pub notes: Option<String>,
    pub photo: Option<String>,
    /// `None` when the checkbox was not submitted
    pub is_active: Option<bool>,
}

impl CowForm {
    pub fn from_cow(cow: &Cow) -> Self {
        Self {
            cow_number: cow.cow_number.clone(),
            cow_name: cow.cow_name.clone().unwrap_or_default(),
            breed: cow.breed.clone(),
            age: cow.age.to_string(),
            color: cow.color.clone(),
            identification_mark: cow.identification_mark.clone(),
            health_status: cow.health_status.clone(),
            last_checkup: cow.last_checkup.map(|d| d.to_string()).unwrap_or_default(),
            notes: cow.notes.clone().unwrap_or_default(),
            photo: cow.photo.clone().unwrap_or_default(),
            is_active: cow.is_active.then(|| "on".to_string()),
        }
    }

    pub fn validate(&self) -> Result<ValidCow, FieldErrors> {
        let mut v = Validator::new();
        let cow = ValidCow {
            cow_number: v.required_text("cow_number", &self.cow_number, 50),
            cow_name: v.optional_text("cow_name", &self.cow_name, Some(100)),
            breed: v.required_text("breed", &self.breed, 100),
            age: v.required_count("age", &self.age),
            color: v.required_text("color", &self.color, 50),
            identification_mark: v.required_long_text("identification_mark", &self.identification_mark),
            health_status: v.required_text("health_status", &self.health_status, 100),
            last_checkup: v.optional_date("last_checkup", &self.last_checkup),
            notes: v.optional_text("notes", &self.notes, None),
            photo: v.optional_text("photo", &self.photo, Some(100)),
            is_active: checkbox(self.is_active.as_deref()),
        };
        v.finish(cow)
    }
}
