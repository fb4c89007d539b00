pub mod get;
pub mod list;

pub use get::{AiDetail, GetAiRecordError};
pub use list::{AiListItem, ListAiRecordsError, PENDING_STATUS};
