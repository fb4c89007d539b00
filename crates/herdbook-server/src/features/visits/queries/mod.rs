pub mod get;
pub mod list;

pub use get::{GetVisitError, VisitDetail};
pub use list::{ListVisitsError, VisitListItem};
