pub mod create;
pub mod deactivate;
pub mod form;
pub mod update;

pub use create::CreateCowError;
pub use deactivate::DeactivateCowError;
pub use form::{CowForm, ValidCow};
pub use update::UpdateCowError;
