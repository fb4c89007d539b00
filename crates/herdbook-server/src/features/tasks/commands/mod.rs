pub mod create;
pub mod delete;
pub mod form;
pub mod update;

pub use create::CreateTaskError;
pub use delete::DeleteTaskError;
pub use form::{TaskForm, ValidTask};
pub use update::{UpdateTaskError, UpdateTaskStatusCommand};
