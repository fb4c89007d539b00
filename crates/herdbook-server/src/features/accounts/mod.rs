//! Accounts: login, logout, language and dashboards
//!
//! Also hosts the default-admin bootstrap used at startup and by the
//! `create-default-admin` binary.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::accounts_routes;
