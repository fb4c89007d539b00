pub mod dashboard;

pub use dashboard::{AdminDashboard, DashboardError, WorkerDashboard};
