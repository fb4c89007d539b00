pub mod add_medicine;
pub mod create;
pub mod delete;
pub mod form;

pub use add_medicine::AddMedicineError;
pub use create::CreateVisitError;
pub use delete::DeleteVisitError;
pub use form::{MedicineForm, VisitForm};
