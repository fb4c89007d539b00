//! Visit and medicine forms

use chrono::{NaiveDate, NaiveTime};
use herdbook_common::VisitType;
use serde::{Deserialize, Serialize};

use crate::{
    features::shared::{FieldErrors, Validator},
    models::Amount,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitForm {
    pub doctor: String,
    pub visit_date: String,
    pub visit_time: String,
    pub visit_type: String,
    pub reason_for_visit: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub treatment_given: String,
    pub doctor_instructions: String,
    pub next_visit_date: String,
    pub visit_cost: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidVisit {
    pub doctor_id: i64,
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
}

impl VisitForm {
    /// Blank form with the visit type preselected
    pub fn initial() -> Self {
        Self {
            visit_type: VisitType::default().as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ValidVisit, FieldErrors> {
        let mut v = Validator::new();
        let visit = ValidVisit {
            doctor_id: v.required_id("doctor", &self.doctor),
            visit_date: v.required_date("visit_date", &self.visit_date),
            visit_time: v.required_time("visit_time", &self.visit_time),
            visit_type: v.choice("visit_type", &self.visit_type),
            reason_for_visit: v.required_long_text("reason_for_visit", &self.reason_for_visit),
            symptoms: v.optional_text("symptoms", &self.symptoms, None),
            diagnosis: v.optional_text("diagnosis", &self.diagnosis, None),
            treatment_given: v.optional_text("treatment_given", &self.treatment_given, None),
            doctor_instructions: v.optional_text("doctor_instructions", &self.doctor_instructions, None),
            next_visit_date: v.optional_date("next_visit_date", &self.next_visit_date),
            visit_cost: v.optional_amount("visit_cost", &self.visit_cost, 10, 2),
            notes: v.optional_text("notes", &self.notes, None),
        };
        v.finish(visit)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicineForm {
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: String,
    pub start_date: String,
    pub end_date: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidMedicine {
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub instructions: Option<String>,
}

impl MedicineForm {
    pub fn validate(&self) -> Result<ValidMedicine, FieldErrors> {
        let mut v = Validator::new();
        let medicine = ValidMedicine {
            medicine_name: v.required_text("medicine_name", &self.medicine_name, 200),
            dosage: v.required_text("dosage", &self.dosage, 100),
            frequency: v.required_text("frequency", &self.frequency, 100),
            duration: v.required_text("duration", &self.duration, 100),
            route: v.optional_text("route", &self.route, Some(50)),
            start_date: v.required_date("start_date", &self.start_date),
            end_date: v.optional_date("end_date", &self.end_date),
            instructions: v.optional_text("instructions", &self.instructions, None),
        };
        v.finish(medicine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::FieldError;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn visit_form() -> VisitForm {
        VisitForm {
            doctor: "2".to_string(),
            visit_date: "2024-05-02".to_string(),
            visit_time: "09:30".to_string(),
            reason_for_visit: "Reduced milk yield".to_string(),
            visit_cost: "850.50".to_string(),
            ..VisitForm::initial()
        }
    }

    #[test]
    fn test_visit_defaults_and_cost() {
        let visit = visit_form().validate().unwrap();
        assert_eq!(visit.visit_type, VisitType::Routine);
        assert_eq!(visit.visit_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(visit.visit_cost, Some(Amount(Decimal::from_str("850.50").unwrap())));
        assert_eq!(visit.symptoms, None);
    }

    #[test]
    fn test_visit_rejects_bad_values() {
        let bad = VisitForm {
            doctor: String::new(),
            visit_time: "9.30am".to_string(),
            visit_type: "checkup".to_string(),
            visit_cost: "123456789.00".to_string(),
            ..visit_form()
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.has("doctor", FieldError::Required));
        assert!(errors.has("visit_time", FieldError::InvalidTime));
        assert!(errors.has("visit_type", FieldError::InvalidChoice));
        assert!(errors.has(
            "visit_cost",
            FieldError::InvalidDecimal { max_digits: 10, decimal_places: 2 }
        ));

        let untyped = VisitForm { visit_type: String::new(), ..visit_form() };
        assert!(untyped.validate().unwrap_err().has("visit_type", FieldError::Required));
    }

    #[test]
    fn test_medicine_required_fields() {
        let errors = MedicineForm {
            medicine_name: "Meloxicam".to_string(),
            route: "x".repeat(51),
            ..MedicineForm::default()
        }
        .validate()
        .unwrap_err();
        assert!(errors.has("dosage", FieldError::Required));
        assert!(errors.has("start_date", FieldError::Required));
        assert!(errors.has("route", FieldError::TooLong { max: 50 }));
        assert!(errors.get("medicine_name").is_empty());
    }
}
