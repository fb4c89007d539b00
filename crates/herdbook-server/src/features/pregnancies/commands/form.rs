//! Pregnancy form, shared by create and update
//!
//! Besides field parsing, a linked AI record is checked against the
//! database: it must belong to the pregnancy's cow and must not already be
//! linked to another pregnancy.

use chrono::NaiveDate;
use herdbook_common::{CalfGender, PregnancyStatus};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    features::shared::{FieldError, FieldErrors, Validator},
    models::{Amount, Pregnancy},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PregnancyForm {
    pub cow: String,
    pub ai_record: String,
    pub confirmation_date: String,
    pub confirmed_by: String,
    pub pregnancy_status: String,
    pub expected_delivery_date: String,
    pub actual_delivery_date: String,
    pub pregnancy_duration: String,
    pub calf_gender: String,
    pub calf_weight: String,
    pub delivery_type: String,
    pub complications: String,
    pub doctor_notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidPregnancy {
    pub cow_id: i64,
    pub ai_record_id: Option<i64>,
    pub confirmation_date: NaiveDate,
    pub confirmed_by: i64,
    pub pregnancy_status: PregnancyStatus,
    pub expected_delivery_date: NaiveDate,
    pub actual_delivery_date: Option<NaiveDate>,
    pub pregnancy_duration: Option<i64>,
    pub calf_gender: Option<CalfGender>,
    pub calf_weight: Option<Amount>,
    pub delivery_type: Option<String>,
    pub complications: Option<String>,
    pub doctor_notes: Option<String>,
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

impl PregnancyForm {
    /// Blank form, the cow preselected when it came from the URL
    pub fn initial(cow_id: Option<i64>) -> Self {
        Self {
            cow: cow_id.map(|id| id.to_string()).unwrap_or_default(),
            pregnancy_status: PregnancyStatus::default().as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn from_pregnancy(pregnancy: &Pregnancy) -> Self {
        Self {
            cow: pregnancy.cow_id.to_string(),
            ai_record: pregnancy.ai_record_id.map(|id| id.to_string()).unwrap_or_default(),
            confirmation_date: pregnancy.confirmation_date.to_string(),
            confirmed_by: pregnancy.confirmed_by.map(|id| id.to_string()).unwrap_or_default(),
            pregnancy_status: pregnancy.pregnancy_status.as_str().to_string(),
            expected_delivery_date: pregnancy.expected_delivery_date.to_string(),
            actual_delivery_date: date_text(pregnancy.actual_delivery_date),
            pregnancy_duration: pregnancy.pregnancy_duration.map(|d| d.to_string()).unwrap_or_default(),
            calf_gender: pregnancy.calf_gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
            calf_weight: pregnancy.calf_weight.map(|w| w.to_string()).unwrap_or_default(),
            delivery_type: pregnancy.delivery_type.clone().unwrap_or_default(),
            complications: pregnancy.complications.clone().unwrap_or_default(),
            doctor_notes: pregnancy.doctor_notes.clone().unwrap_or_default(),
        }
    }

    /// `path_cow` replaces the submitted `cow` field when set
    pub fn validate(&self, path_cow: Option<i64>) -> Result<ValidPregnancy, FieldErrors> {
        let mut v = Validator::new();
        let cow_id = match path_cow {
            Some(id) => id,
            None => v.required_id("cow", &self.cow),
        };
        let pregnancy = ValidPregnancy {
            cow_id,
            ai_record_id: v.optional_id("ai_record", &self.ai_record),
            confirmation_date: v.required_date("confirmation_date", &self.confirmation_date),
            confirmed_by: v.required_id("confirmed_by", &self.confirmed_by),
            pregnancy_status: v.choice("pregnancy_status", &self.pregnancy_status),
            expected_delivery_date: v.required_date("expected_delivery_date", &self.expected_delivery_date),
            actual_delivery_date: v.optional_date("actual_delivery_date", &self.actual_delivery_date),
            pregnancy_duration: v.optional_count("pregnancy_duration", &self.pregnancy_duration),
            calf_gender: v.optional_choice("calf_gender", &self.calf_gender),
            calf_weight: v.optional_amount("calf_weight", &self.calf_weight, 5, 2),
            delivery_type: v.optional_text("delivery_type", &self.delivery_type, Some(50)),
            complications: v.optional_text("complications", &self.complications, None),
            doctor_notes: v.optional_text("doctor_notes", &self.doctor_notes, None),
        };
        v.finish(pregnancy)
    }
}

/// Checks the linked AI record of a pregnancy of `cow_id`
///
/// `pregnancy_id` is the pregnancy being edited, which may keep its own link.
pub async fn check_ai_record(
    pool: &SqlitePool,
    ai_record_id: i64,
    cow_id: i64,
    pregnancy_id: Option<i64>,
) -> Result<Option<FieldError>, sqlx::Error> {
    let owner: Option<i64> =
        sqlx::query_scalar("SELECT cow_id FROM artificial_inseminations WHERE id = ?")
            .bind(ai_record_id)
            .fetch_optional(pool)
            .await?;
    match owner {
        None => return Ok(Some(FieldError::InvalidChoice)),
        Some(owner) if owner != cow_id => return Ok(Some(FieldError::AiRecordOtherCow)),
        Some(_) => {},
    }

    let linked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM pregnancies WHERE ai_record_id = ? AND id IS NOT ?)",
    )
    .bind(ai_record_id)
    .bind(pregnancy_id)
    .fetch_one(pool)
    .await?;

    Ok(linked.then_some(FieldError::AiRecordLinked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{date, test_pool, TestAiRecord, TestCow};

    fn form() -> PregnancyForm {
        PregnancyForm {
            cow: "3".to_string(),
            confirmation_date: "2024-05-01".to_string(),
            confirmed_by: "2".to_string(),
            expected_delivery_date: "2024-12-10".to_string(),
            ..PregnancyForm::initial(None)
        }
    }

    #[test]
    fn test_validate_defaults() {
        let pregnancy = form().validate(None).unwrap();
        assert_eq!(pregnancy.pregnancy_status, PregnancyStatus::Suspected);
        assert_eq!(pregnancy.ai_record_id, None);
        assert_eq!(pregnancy.calf_gender, None);
        assert_eq!(form().validate(Some(9)).unwrap().cow_id, 9);
    }

    #[test]
    fn test_validate_errors() {
        let bad = PregnancyForm {
            confirmed_by: String::new(),
            pregnancy_status: "twins".to_string(),
            calf_gender: "unknown".to_string(),
            calf_weight: "1000".to_string(),
            pregnancy_duration: "-3".to_string(),
            ..form()
        };
        let errors = bad.validate(None).unwrap_err();
        assert!(errors.has("confirmed_by", FieldError::Required));
        assert!(errors.has("pregnancy_status", FieldError::InvalidChoice));
        assert!(errors.has("calf_gender", FieldError::InvalidChoice));
        assert!(errors.has(
            "calf_weight",
            FieldError::InvalidDecimal {
                max_digits: 5,
                decimal_places: 2
            }
        ));
        assert!(errors.has("pregnancy_duration", FieldError::Negative));

        let unset = PregnancyForm { pregnancy_status: String::new(), ..form() };
        assert!(unset.validate(None).unwrap_err().has("pregnancy_status", FieldError::Required));
    }

    #[tokio::test]
    async fn test_check_ai_record() {
        let pool = test_pool().await;
        let gauri = TestCow::new("C-101").insert(&pool).await.unwrap();
        let kamdhenu = TestCow::new("C-102").insert(&pool).await.unwrap();
        let ai = TestAiRecord::new(&gauri).on(date(2024, 3, 2)).insert(&pool).await.unwrap();

        assert_eq!(check_ai_record(&pool, ai.id, gauri.id, None).await.unwrap(), None);
        assert_eq!(
            check_ai_record(&pool, ai.id, kamdhenu.id, None).await.unwrap(),
            Some(FieldError::AiRecordOtherCow)
        );
        assert_eq!(
            check_ai_record(&pool, 999, gauri.id, None).await.unwrap(),
            Some(FieldError::InvalidChoice)
        );

        let pregnancy_id: i64 = sqlx::query_scalar(
            "INSERT INTO pregnancies (cow_id, ai_record_id, confirmation_date, pregnancy_status, \
             expected_delivery_date, created_at, updated_at) \
             VALUES (?, ?, '2024-05-01', 'confirmed', '2024-12-10', '2024-05-01T00:00:00Z', '2024-05-01T00:00:00Z') \
             RETURNING id",
        )
        .bind(gauri.id)
        .bind(ai.id)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(
            check_ai_record(&pool, ai.id, gauri.id, None).await.unwrap(),
            Some(FieldError::AiRecordLinked)
        );
        assert_eq!(check_ai_record(&pool, ai.id, gauri.id, Some(pregnancy_id)).await.unwrap(), None);
    }
}
