//! Veterinary doctors
//!
//! Anyone signed in can see the list; only admins add, edit or deactivate.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::doctors_routes;
