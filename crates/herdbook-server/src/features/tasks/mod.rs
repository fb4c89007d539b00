//! Task assignment and tracking
//!
//! Admins assign tasks to workers and manage them; workers see and move the
//! status of their own tasks.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::tasks_routes;
