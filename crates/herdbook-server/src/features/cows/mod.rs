//! Cow registry
//!
//! Cows are the parent of every veterinary record. Deactivating a cow hides
//! it from lists and pickers but its detail page and history remain.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::cows_routes;
