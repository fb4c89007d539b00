pub mod create;
pub mod delete;
pub mod form;

pub use create::CreateAiRecordError;
pub use delete::DeleteAiRecordError;
pub use form::{AiForm, ValidAiRecord};
