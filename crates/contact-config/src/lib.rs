// ============================================================================
// Contact Config - Centralized configuration management
// ============================================================================
//
// Loads all service configuration from environment variables once at
// startup. Required store settings fail fast with an error naming the
// missing variable; everything else has sensible defaults.
//
// ============================================================================

mod constants;
mod database;

pub use constants::MAX_REQUEST_BODY_SIZE;
pub use database::DbConfig;

use anyhow::{Context, Result};
use constants::*;

/// Main configuration for the contact service
#[derive(Clone, Debug)]
pub struct Config {
    pub mysql_host: String,
    pub mysql_user: String,
    pub mysql_password: String,
    pub mysql_database: String,
    pub mysql_port: u16,

    /// HTTP listen port
    pub port: u16,

    /// Allowed cross-origin caller; unset means permissive CORS
    pub frontend_url: Option<String>,

    pub rust_log: String,

    pub db: DbConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            mysql_host: std::env::var("MYSQLHOST").context("MYSQLHOST is required")?,
            mysql_user: std::env::var("MYSQLUSER").context("MYSQLUSER is required")?,
            mysql_password: std::env::var("MYSQLPASSWORD").context("MYSQLPASSWORD is required")?,
            mysql_database: std::env::var("MYSQLDATABASE").context("MYSQLDATABASE is required")?,

            mysql_port: std::env::var("MYSQLPORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_MYSQL_PORT),

            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            frontend_url: std::env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty()),

            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),

            db: DbConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_defaults() {
        // None of the DB_* variables are set in the test environment
        let db = DbConfig::from_env();

        assert_eq!(db.max_connections, 10);
        assert_eq!(db.connect_timeout_secs, 60);
        assert_eq!(db.retry_delay_secs, 5);
        assert_eq!(db.max_connect_attempts, 10);
    }
}
