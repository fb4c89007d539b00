//! Pregnancy tracking
//!
//! A pregnancy may link the AI record it resulted from, provided the record
//! belongs to the same cow and no other pregnancy links it.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::pregnancies_routes;
