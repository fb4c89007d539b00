pub mod list;

pub use list::{GetVaccinationError, ListVaccinationsError, VaccinationListItem};
