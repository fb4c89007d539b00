//! Vaccination records

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::vaccinations_routes;
