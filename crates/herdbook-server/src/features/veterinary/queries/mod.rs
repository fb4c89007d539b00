pub mod dashboard;

pub use dashboard::{VeterinaryDashboard, VeterinaryDashboardError};
