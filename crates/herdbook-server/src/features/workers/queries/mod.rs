pub mod list;

pub use list::{GetWorkerError, ListWorkersError, WorkerListItem};
