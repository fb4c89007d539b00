//! Option lists for `<select>` fields
//!
//! Only active rows are offered. Submitted ids are checked against the same
//! filters by the `*_is_active` helpers.

use herdbook_common::{CalfGender, PregnancyStatus, TaskStatus, VisitType};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// One `<option>` of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Choice {
    pub id: i64,
    pub label: String,
}

/// One `<option>` of a fixed choice field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn task_statuses() -> Vec<ChoiceOption> {
    TaskStatus::ALL
        .iter()
        .map(|s| ChoiceOption { value: s.as_str(), label: s.label() })
        .collect()
}

pub fn visit_types() -> Vec<ChoiceOption> {
    VisitType::ALL
        .iter()
        .map(|t| ChoiceOption { value: t.as_str(), label: t.label() })
        .collect()
}

pub fn pregnancy_statuses() -> Vec<ChoiceOption> {
    PregnancyStatus::ALL
        .iter()
        .map(|s| ChoiceOption { value: s.as_str(), label: s.label() })
        .collect()
}

pub fn calf_genders() -> Vec<ChoiceOption> {
    CalfGender::ALL
        .iter()
        .map(|g| ChoiceOption { value: g.as_str(), label: g.label() })
        .collect()
}

/// Active workers, labelled "First Last (EMP-ID)"
pub async fn active_workers(pool: &SqlitePool) -> Result<Vec<Choice>, sqlx::Error> {
    sqlx::query_as::<_, Choice>(
        r#"
        SELECT w.id,
               CASE WHEN trim(u.first_name || ' ' || u.last_name) = ''
                    THEN u.username
                    ELSE trim(u.first_name || ' ' || u.last_name)
               END || ' (' || w.employee_id || ')' AS label
        FROM workers w
        JOIN users u ON u.id = w.user_id
        WHERE w.is_active = 1
        ORDER BY u.first_name, u.last_name, w.employee_id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Active cows, labelled "C-101 - Gauri"
pub async fn active_cows(pool: &SqlitePool) -> Result<Vec<Choice>, sqlx::Error> {
    sqlx::query_as::<_, Choice>(
        r#"
        SELECT id, cow_number || ' - ' || COALESCE(NULLIF(cow_name, ''), 'Unnamed') AS label
        FROM cows
        WHERE is_active = 1
        ORDER BY cow_number
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn active_doctors(pool: &SqlitePool) -> Result<Vec<Choice>, sqlx::Error> {
    sqlx::query_as::<_, Choice>(
        "SELECT id, name AS label FROM doctors WHERE is_active = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// AI records not yet linked to a pregnancy (plus `keep`, the record the
/// pregnancy being edited already links), labelled "C-101 - 2024-03-02"
pub async fn unlinked_ai_records(
    pool: &SqlitePool,
    keep: Option<i64>,
) -> Result<Vec<Choice>, sqlx::Error> {
    sqlx::query_as::<_, Choice>(
        r#"
        SELECT ai.id, c.cow_number || ' - ' || ai.ai_date AS label
        FROM artificial_inseminations ai
        JOIN cows c ON c.id = ai.cow_id
        WHERE ai.id = ?
           OR NOT EXISTS (SELECT 1 FROM pregnancies p WHERE p.ai_record_id = ai.id)
        ORDER BY ai.ai_date DESC, ai.id DESC
        "#,
    )
    .bind(keep)
    .fetch_all(pool)
    .await
}

async fn is_active(pool: &SqlitePool, sql: &str, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar(sql).bind(id).fetch_optional(pool).await?;
    Ok(found.is_some())
}

pub async fn worker_is_active(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    is_active(pool, "SELECT id FROM workers WHERE id = ? AND is_active = 1", id).await
}

pub async fn cow_is_active(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    is_active(pool, "SELECT id FROM cows WHERE id = ? AND is_active = 1", id).await
}

pub async fn doctor_is_active(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    is_active(pool, "SELECT id FROM doctors WHERE id = ? AND is_active = 1", id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{
        date, test_pool, TestAiRecord, TestCow, TestDoctor, TestUser, TestWorker,
    };

    #[test]
    fn test_fixed_choice_options() {
        let statuses = task_statuses();
        assert_eq!(statuses.len(), 4);
        assert_eq!(statuses[1], ChoiceOption { value: "in_progress", label: "In Progress" });
        assert_eq!(visit_types()[4].value, "pregnancy_check");
        assert_eq!(pregnancy_statuses()[0].value, "suspected");
        assert_eq!(calf_genders().len(), 2);
    }

    #[tokio::test]
    async fn test_choices_only_offer_active_rows() {
        let pool = test_pool().await;
        let ravi = TestUser::worker("ravi").named("Ravi", "Patil").insert(&pool).await.unwrap();
        let sita = TestUser::worker("sita").insert(&pool).await.unwrap();
        let active = TestWorker::new(&ravi, "W100").insert(&pool).await.unwrap();
        let inactive = TestWorker::new(&sita, "W101").inactive().insert(&pool).await.unwrap();

        let workers = active_workers(&pool).await.unwrap();
        assert_eq!(workers, vec![Choice { id: active.id, label: "Ravi Patil (W100)".to_string() }]);
        assert!(worker_is_active(&pool, active.id).await.unwrap());
        assert!(!worker_is_active(&pool, inactive.id).await.unwrap());

        let gauri = TestCow::new("C-101").named("Gauri").insert(&pool).await.unwrap();
        let unnamed = TestCow::new("C-102").insert(&pool).await.unwrap();
        TestCow::new("C-103").inactive().insert(&pool).await.unwrap();
        let cows = active_cows(&pool).await.unwrap();
        assert_eq!(cows.len(), 2);
        assert_eq!(cows[0].label, "C-101 - Gauri");
        assert_eq!(cows[1].label, "C-102 - Unnamed");
        assert!(cow_is_active(&pool, gauri.id).await.unwrap());
        assert!(cow_is_active(&pool, unnamed.id).await.unwrap());

        let doctor = TestDoctor::new("Dr. Kulkarni", "LIC-9").insert(&pool).await.unwrap();
        TestDoctor::new("Dr. Absent", "LIC-10").inactive().insert(&pool).await.unwrap();
        assert_eq!(
            active_doctors(&pool).await.unwrap(),
            vec![Choice { id: doctor.id, label: "Dr. Kulkarni".to_string() }]
        );
        assert!(doctor_is_active(&pool, doctor.id).await.unwrap());
        assert!(!doctor_is_active(&pool, 999).await.unwrap());
    }

    #[tokio::test]
    async fn test_unlinked_ai_records() {
        let pool = test_pool().await;
        let cow = TestCow::new("C-101").insert(&pool).await.unwrap();
        let linked = TestAiRecord::new(&cow).on(date(2024, 3, 2)).insert(&pool).await.unwrap();
        let free = TestAiRecord::new(&cow).on(date(2024, 6, 9)).insert(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO pregnancies (cow_id, ai_record_id, confirmation_date, pregnancy_status, \
             expected_delivery_date, created_at, updated_at) \
             VALUES (?, ?, '2024-05-01', 'confirmed', '2024-12-10', '2024-05-01T00:00:00Z', '2024-05-01T00:00:00Z')",
        )
        .bind(cow.id)
        .bind(linked.id)
        .execute(&pool)
        .await
        .unwrap();

        assert_eq!(
            unlinked_ai_records(&pool, None).await.unwrap(),
            vec![Choice { id: free.id, label: "C-101 - 2024-06-09".to_string() }]
        );
        let ids: Vec<_> = unlinked_ai_records(&pool, Some(linked.id))
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![free.id, linked.id]);
    }
}
