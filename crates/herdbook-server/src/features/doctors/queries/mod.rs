pub mod list;

pub use list::{GetDoctorError, ListDoctorsError};
