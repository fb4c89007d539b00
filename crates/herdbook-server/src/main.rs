//! Herdbook Server - Main entry point

use anyhow::Result;
use herdbook_common::logging::{init_logging, LogConfig};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tracing::info;

use herdbook_server::{
    api::{create_router, AppState},
    config::Config,
    db,
    features::accounts::commands::{bootstrap_admin, BootstrapAdminCommand, BootstrapAdminResponse},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("herdbook-server")
        .filter_directives("herdbook_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting Herdbook Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&(&config.database).into()).await?;
    info!("Database connection pool established");

    db::migrate(&pool).await?;
    info!("Database migrations completed");

    if config.auth.bootstrap_admin {
        let command = BootstrapAdminCommand {
            username: config.auth.admin_username.clone(),
            password: config.auth.admin_password.clone(),
            bcrypt_cost: config.auth.bcrypt_cost,
        };
        match bootstrap_admin::handle(&pool, command).await? {
            BootstrapAdminResponse::Created { username, .. } => {
                info!(username = %username, "Default admin account created");
            },
            BootstrapAdminResponse::Skipped => {
                info!("Admin account already present, bootstrap skipped");
            },
        }
    }

    let state = AppState::new(pool, &config);

    match state.sessions.purge_expired().await {
        Ok(removed) => info!(removed, "Expired sessions purged"),
        Err(e) => tracing::warn!("Failed to purge expired sessions: {}", e),
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
