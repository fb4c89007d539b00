pub mod list;

pub use list::{GetPregnancyError, ListPregnanciesError, PregnancyListItem};
