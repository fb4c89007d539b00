//! Feature slices
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes:
//!
//! - `commands/` - writes (create, update, delete), one module per command
//! - `queries/` - reads (get, list), one module per query
//! - `routes.rs` - HTTP handlers and the mapping of slice errors to
//!   [`AppError`](crate::error::AppError)
//!
//! # Features
//!
//! - **accounts**: login, logout, language switch, dashboards
//! - **workers**: worker accounts (admin)
//! - **tasks**: task assignment and status updates
//! - **cows**: the herd registry
//! - **doctors**: veterinary doctors
//! - **visits**: veterinary visits and prescribed medicines
//! - **inseminations**: artificial insemination records
//! - **pregnancies**: pregnancy tracking
//! - **vaccinations**: vaccination records
//! - **veterinary**: veterinary dashboard

pub mod accounts;
pub mod cows;
pub mod doctors;
pub mod inseminations;
pub mod pregnancies;
pub mod shared;
pub mod tasks;
pub mod vaccinations;
pub mod veterinary;
pub mod visits;
pub mod workers;

use axum::Router;

use crate::api::AppState;

/// Every page route, without the session layer
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(accounts::accounts_routes())
        .merge(workers::workers_routes())
        .merge(tasks::tasks_routes())
        .merge(cows::cows_routes())
        .merge(veterinary::veterinary_routes())
        .merge(doctors::doctors_routes())
        .merge(visits::visits_routes())
        .merge(inseminations::inseminations_routes())
        .merge(pregnancies::pregnancies_routes())
        .merge(vaccinations::vaccinations_routes())
}
