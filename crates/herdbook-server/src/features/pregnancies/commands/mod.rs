pub mod create;
pub mod delete;
pub mod form;
pub mod update;

pub use create::CreatePregnancyError;
pub use delete::DeletePregnancyError;
pub use form::{PregnancyForm, ValidPregnancy};
pub use update::UpdatePregnancyError;
