//! Artificial insemination records
//!
//! A record starts with the outcome "Pending". At most one pregnancy may
//! link back to it.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::inseminations_routes;
