//! Configuration management

use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://herdbook.db?mode=rwc";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 1;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default session lifetime (two weeks).
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 336;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// bcrypt accepts work factors in this range.
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Default username of the bootstrap administrator.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Default password of the bootstrap administrator. Change it after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_hours: i64,
    /// Adds `Secure` to the session cookie; enable behind TLS
    pub cookie_secure: bool,
}

/// Password hashing and admin bootstrap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
    pub bootstrap_admin: bool,
    pub admin_username: String,
    #[serde(skip_serializing)]
    pub admin_password: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("HERDBOOK_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_or("HERDBOOK_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_or(
                    "HERDBOOK_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
            },
            session: SessionConfig {
                ttl_hours: env_or("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS),
                cookie_secure: env_or("SESSION_COOKIE_SECURE", false),
            },
            auth: AuthConfig {
                bcrypt_cost: env_or("BCRYPT_COST", DEFAULT_BCRYPT_COST),
                bootstrap_admin: env_or("HERDBOOK_BOOTSTRAP_ADMIN", true),
                admin_username: std::env::var("HERDBOOK_ADMIN_USERNAME")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
                admin_password: std::env::var("HERDBOOK_ADMIN_PASSWORD")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if self.session.ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be greater than 0");
        }

        if !BCRYPT_COST_RANGE.contains(&self.auth.bcrypt_cost) {
            anyhow::bail!(
                "BCRYPT_COST must be between {} and {}, got {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end(),
                self.auth.bcrypt_cost
            );
        }

        if self.auth.bootstrap_admin
            && (self.auth.admin_username.trim().is_empty() || self.auth.admin_password.is_empty())
        {
            anyhow::bail!("Admin bootstrap needs a non-empty username and password");
        }

        if self.auth.admin_password == DEFAULT_ADMIN_PASSWORD && self.auth.bootstrap_admin {
            tracing::warn!("Bootstrap admin uses the default password - set HERDBOOK_ADMIN_PASSWORD");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            },
            session: SessionConfig {
                ttl_hours: DEFAULT_SESSION_TTL_HOURS,
                cookie_secure: false,
            },
            auth: AuthConfig {
                bcrypt_cost: DEFAULT_BCRYPT_COST,
                bootstrap_admin: true,
                admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
                admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            },
        }
    }
}
