// ============================================================================
// Database Configuration
// ============================================================================

use crate::constants::*;

/// Database connection pool and reconnect policy configuration
#[derive(Clone, Debug)]
pub struct DbConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool (seconds)
    pub acquire_timeout_secs: u64,
    /// Bound on a single connect attempt (seconds)
    pub connect_timeout_secs: u64,
    /// Delay between failed connect attempts (seconds)
    pub retry_delay_secs: u64,
    /// Connect attempts before the outage is treated as fatal
    pub max_connect_attempts: u32,
}

impl DbConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            connect_timeout_secs: std::env::var("DB_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            retry_delay_secs: std::env::var("DB_RETRY_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_DELAY_SECS),
            max_connect_attempts: std::env::var("DB_MAX_CONNECT_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECT_ATTEMPTS),
        }
    }
}
