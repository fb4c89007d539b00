//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **validation**: form field parsing and localized field errors
//! - **error_helpers**: database constraint violation helpers
//! - **choices**: option lists for `<select>` fields (workers, cows, doctors)
//! - **records**: cow and doctor checks shared by the veterinary record forms
//! - **test_helpers**: in-memory database and fixtures (test-only)

pub mod choices;
pub mod error_helpers;
pub mod records;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

pub use choices::{Choice, ChoiceOption};
pub use validation::{checkbox, FieldError, FieldErrors, Validator};
