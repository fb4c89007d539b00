//! Checks shared by the cow sub-record forms (visits, AI records,
//! pregnancies, vaccinations)

use sqlx::SqlitePool;

use super::{choices, FieldError, FieldErrors};

pub async fn cow_exists(pool: &SqlitePool, cow_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cows WHERE id = ?)")
        .bind(cow_id)
        .fetch_one(pool)
        .await
}

/// Field errors for selected cow and doctor ids that are not on offer
///
/// `cow` is `None` when the cow comes from the URL and was already resolved.
/// `keep_cow` is accepted even if inactive (the record's current cow).
pub async fn check_selections(
    pool: &SqlitePool,
    cow: Option<i64>,
    keep_cow: Option<i64>,
    doctor_field: &'static str,
    doctor: i64,
) -> Result<FieldErrors, sqlx::Error> {
    let mut errors = FieldErrors::new();
    if let Some(cow_id) = cow {
        if keep_cow != Some(cow_id) && !choices::cow_is_active(pool, cow_id).await? {
            errors.add("cow", FieldError::InvalidChoice);
        }
    }
    if !choices::doctor_is_active(pool, doctor).await? {
        errors.add(doctor_field, FieldError::InvalidChoice);
    }
    Ok(errors)
}
