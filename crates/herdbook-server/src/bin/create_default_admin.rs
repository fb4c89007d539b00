// Default admin bootstrap
// Creates the first admin account from HERDBOOK_ADMIN_USERNAME / HERDBOOK_ADMIN_PASSWORD

use anyhow::{Context, Result};
use herdbook_common::logging::{init_logging, LogConfig, LogOutput};
use herdbook_server::{
    config::Config,
    db,
    features::accounts::commands::{bootstrap_admin, BootstrapAdminCommand, BootstrapAdminResponse},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .output(LogOutput::Console)
        .filter_directives("herdbook_server=info,sqlx=warn")
        .build()
        .merge_env()?;
    init_logging(&log_config)?;

    let config = Config::load().context("Failed to load config")?;

    let pool = db::create_pool(&(&config.database).into())
        .await
        .context("Failed to connect to database")?;
    db::migrate(&pool).await.context("Failed to run migrations")?;

    let command = BootstrapAdminCommand {
        username: config.auth.admin_username.clone(),
        password: config.auth.admin_password.clone(),
        bcrypt_cost: config.auth.bcrypt_cost,
    };

    match bootstrap_admin::handle(&pool, command).await? {
        BootstrapAdminResponse::Created { user_id, username } => {
            info!(user_id, "Admin user created");
            println!("Created admin user '{}'", username);
            println!("Change the password after first login.");
        },
        BootstrapAdminResponse::Skipped => {
            println!("An admin user already exists, nothing to do.");
        },
    }

    pool.close().await;
    Ok(())
}
