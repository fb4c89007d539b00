//! Veterinary dashboard
//!
//! The records themselves live in their own slices: `doctors`, `visits`,
//! `inseminations`, `pregnancies` and `vaccinations`.

pub mod queries;
pub mod routes;

pub use routes::veterinary_routes;
