//! Herdbook Server Library
#![recursion_limit = "256"]
//!
//! Server-rendered web application for running a dairy farm: workers and
//! their tasks, the cow registry, and the veterinary records kept per cow.
//!
//! # Architecture
//!
//! Each feature is a vertical slice under [`features`] with its own
//! `commands` (writes), `queries` (reads) and `routes` (HTTP handlers).
//! Handlers resolve the signed-in [`auth::Actor`] through the session
//! extractor, call a command or query, then either render a page or
//! redirect with a flash message.
//!
//! ## Framework Stack
//!
//! - **Axum**: routing, extractors and form handling
//! - **SQLx**: SQLite pool and migrations
//! - **Tower**: middleware layers (tracing, cache headers)
//!
//! # Example
//!
//! ```no_run
//! use herdbook_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&(&config.database).into()).await?;
//!     db::migrate(&pool).await?;
//!     let app = api::create_router(api::AppState::new(pool, &config));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;
pub mod session;

pub use error::{AppError, AppResult};
