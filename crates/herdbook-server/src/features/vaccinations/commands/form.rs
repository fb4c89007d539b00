use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::features::shared::{FieldErrors, Validator};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaccinationForm {
    pub cow: String,
    pub vaccine_name: String,
    pub disease_prevention: String,
    pub vaccination_date: String,
    pub next_due_date: String,
    pub batch_number: String,
    pub administered_by: String,
    pub dosage: String,
    pub route: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidVaccination {
    pub cow_id: i64,
    pub vaccine_name: String,
    pub disease_prevention: String,
    pub vaccination_date: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub administered_by: i64,
    pub dosage: String,
    pub route: String,
    pub notes: Option<String>,
}

impl VaccinationForm {
    pub fn initial(cow_id: Option<i64>) -> Self {
        Self {
            cow: cow_id.map(|id| id.to_string()).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// `path_cow` replaces the submitted `cow` field when set
    pub fn validate(&self, path_cow: Option<i64>) -> Result<ValidVaccination, FieldErrors> {
        let mut v = Validator::new();
        let cow_id = match path_cow {
            Some(id) => id,
            None => v.required_id("cow", &self.cow),
        };
        let vaccination = ValidVaccination {
            cow_id,
            vaccine_name: v.required_text("vaccine_name", &self.vaccine_name, 200),
            disease_prevention: v.required_text("disease_prevention", &self.disease_prevention, 200),
            vaccination_date: v.required_date("vaccination_date", &self.vaccination_date),
            next_due_date: v.optional_date("next_due_date", &self.next_due_date),
            batch_number: v.optional_text("batch_number", &self.batch_number, Some(100)),
            administered_by: v.required_id("administered_by", &self.administered_by),
            dosage: v.required_text("dosage", &self.dosage, 100),
            route: v.required_text("route", &self.route, 50),
            notes: v.optional_text("notes", &self.notes, None),
        };
        v.finish(vaccination)
    }
}
