pub mod create;
pub mod deactivate;

pub use create::{CreateWorkerCommand, CreateWorkerError};
pub use deactivate::DeactivateWorkerError;
