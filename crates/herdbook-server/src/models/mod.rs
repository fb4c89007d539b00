//! Database models
//!
//! One struct per table, decoded with `sqlx::FromRow`. Joined list rows live
//! next to the queries that produce them.

mod account;
mod amount;
mod cow;
mod task;
mod veterinary;

pub use account::{User, Worker};
pub(crate) use account::full_name;
pub use amount::Amount;
pub use cow::Cow;
pub use task::Task;
pub use veterinary::{ArtificialInsemination, Doctor, Medicine, Pregnancy, Vaccination, VeterinaryVisit};
