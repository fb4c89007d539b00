pub mod create;
pub mod delete;
pub mod form;

pub use create::CreateVaccinationError;
pub use delete::DeleteVaccinationError;
pub use form::{VaccinationForm, ValidVaccination};
