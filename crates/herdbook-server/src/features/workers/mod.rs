//! Worker accounts, managed by admins

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::workers_routes;
