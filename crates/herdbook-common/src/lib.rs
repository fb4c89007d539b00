//! Herdbook common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared pieces used by every Herdbook crate:
//!
//! - **Error handling**: [`HerdbookError`] and its [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by `LOG_*` variables
//! - **Locale**: display [`Language`] and the [`Message`] table
//! - **Types**: stored choice enums (roles, task status, visit type, ...)

pub mod error;
pub mod locale;
pub mod logging;
pub mod types;

pub use error::{HerdbookError, Result};
pub use locale::{Language, Message};
pub use types::{CalfGender, PregnancyStatus, Role, TaskStatus, VisitType};
