//! Error types for Herdbook

use thiserror::Error;

/// Result type alias for Herdbook operations
pub type Result<T> = std::result::Result<T, HerdbookError>;

/// Main error type for Herdbook
#[derive(Error, Debug)]
pub enum HerdbookError {
    #[error("Invalid {kind} value: '{value}'")]
    InvalidChoice { kind: &'static str, value: String },
}

impl HerdbookError {
    /// Error for a stored or submitted value that is not one of the allowed choices
    pub fn invalid_choice(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidChoice {
            kind,
            value: value.into(),
        }
    }
}
