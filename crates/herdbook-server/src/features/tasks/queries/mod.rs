pub mod get;
pub mod list;

pub use get::GetTaskError;
pub use list::{ListTasksError, ListTasksQuery, TaskListItem, TaskScope};
