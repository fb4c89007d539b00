//! Database error handling utilities
//!
//! SQLite reports unique and foreign key violations through
//! `sqlx::error::DatabaseError`; these helpers turn them into field errors.
//!
//! ```rust,ignore
//! sqlx::query("INSERT INTO cows (cow_number, ...) VALUES (?, ...)")
//!     .execute(pool)
//!     .await
//!     .map_err(|e| map_unique_violation(e, "cow_number", CreateCowError::Validation, CreateCowError::Database))?;
//! ```

use sqlx::Error as SqlxError;

use super::validation::{FieldError, FieldErrors};

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_foreign_key_violation();
    }
    false
}

/// Turn a unique violation into a [`FieldError::Duplicate`] on `field`
///
/// Any other error is passed to `default_wrapper`.
pub fn map_unique_violation<E, V, F>(
    error: SqlxError,
    field: &'static str,
    validation: V,
    default_wrapper: F,
) -> E
where
    V: FnOnce(FieldErrors) -> E,
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        validation(FieldErrors::single(field, FieldError::Duplicate))
    } else {
        default_wrapper(error)
    }
}
