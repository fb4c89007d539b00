pub mod bootstrap_admin;
pub mod login;

pub use bootstrap_admin::{BootstrapAdminCommand, BootstrapAdminError, BootstrapAdminResponse};
pub use login::{LoginCommand, LoginError, LoginResponse};
