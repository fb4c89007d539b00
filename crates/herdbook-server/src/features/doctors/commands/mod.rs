pub mod create;
pub mod deactivate;
pub mod form;
pub mod update;

pub use create::CreateDoctorError;
pub use deactivate::DeactivateDoctorError;
pub use form::{DoctorForm, ValidDoctor};
pub use update::UpdateDoctorError;
