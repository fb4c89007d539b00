pub mod get;
pub mod list;

pub use get::{CowDetail, GetCowError};
pub use list::ListCowsError;
