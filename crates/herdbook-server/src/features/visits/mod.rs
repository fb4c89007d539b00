//! Veterinary visits and the medicines prescribed during them

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::visits_routes;
