// ============================================================================
// Connection Manager
// ============================================================================
//
// Owns the lifecycle of the MySQL pool. The service stays up while the
// store is unreachable: connect attempts are retried on a fixed delay up
// to an attempt budget, after which the outage is reported to the host
// through a watch channel instead of killing the process from here.
//
// State machine:
//   Disconnected -> Connecting -> Ready(pool)
//   Ready -> Disconnected on a fatal store error observed during a query
//   Connecting -> Disconnected + fatal signal once the budget is spent
//
// ============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use contact_config::{Config, DbConfig};
use contact_error::AppError;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tokio::sync::{watch, RwLock};
use tokio::time::timeout;

use crate::MIGRATOR;

enum ConnectionState {
    Disconnected,
    Connecting,
    Ready(MySqlPool),
}

pub struct ConnectionManager {
    db: DbConfig,
    options: MySqlConnectOptions,
    state: RwLock<ConnectionState>,
    fatal_tx: watch::Sender<Option<String>>,
}

pub(crate) struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl ConnectionManager {
    /// Create a manager in the `Disconnected` state; `spawn_connect` starts
    /// the connect cycle.
    pub fn new(config: &Config) -> Arc<Self> {
        let (fatal_tx, _) = watch::channel(None);
        Arc::new(Self {
            db: config.db.clone(),
            options: connect_options(config),
            state: RwLock::new(ConnectionState::Disconnected),
            fatal_tx,
        })
    }

    /// Subscribe to the fatal-outage signal
    ///
    /// Fires at most once, when the connect cycle has spent its attempt
    /// budget. The host decides what to do with it; the manager never
    /// terminates the process itself.
    pub fn fatal_signal(&self) -> watch::Receiver<Option<String>> {
        self.fatal_tx.subscribe()
    }

    /// The fatal reason, if the manager has given up
    pub fn fatal_reason(&self) -> Option<String> {
        self.fatal_tx.borrow().clone()
    }

    /// Start the background connect cycle
    pub fn spawn_connect(self: Arc<Self>) {
        tokio::spawn(self.run_connect_cycle());
    }

    /// Hand out the pool when the manager is `Ready`
    ///
    /// Handlers call this before every query; while the store is down they
    /// answer service-unavailable instead of blocking. The returned handle
    /// is the pool itself: each query borrows a pooled connection only for
    /// its own round trip and returns it when the query future completes.
    pub async fn acquire(&self) -> Result<MySqlPool, AppError> {
        match &*self.state.read().await {
            ConnectionState::Ready(pool) => Ok(pool.clone()),
            _ => Err(AppError::Unavailable),
        }
    }

    /// Report a store error observed during a query
    ///
    /// Fatal connection errors flip `Ready` back to the connect cycle;
    /// transient pool errors change nothing.
    pub fn observe(self: Arc<Self>, err: &sqlx::Error) {
        if is_fatal_store_error(err) {
            tokio::spawn(self.handle_fatal());
        }
    }

    /// Current state label for status reporting
    pub async fn state_label(&self) -> &'static str {
        match &*self.state.read().await {
            ConnectionState::Ready(_) => "connected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Disconnected => "disconnected",
        }
    }

    pub async fn is_ready(&self) -> bool {
        matches!(&*self.state.read().await, ConnectionState::Ready(_))
    }

    /// Close the pool and return to `Disconnected`; used on shutdown
    pub async fn close(&self) {
        let pool = {
            let mut state = self.state.write().await;
            match std::mem::replace(&mut *state, ConnectionState::Disconnected) {
                ConnectionState::Ready(pool) => Some(pool),
                _ => None,
            }
        };
        if let Some(pool) = pool {
            pool.close().await;
        }
    }

    pub(crate) async fn run_connect_cycle(self: Arc<Self>) {
        {
            let mut state = self.state.write().await;
            *state = ConnectionState::Connecting;
        }

        let policy = RetryPolicy {
            max_attempts: self.db.max_connect_attempts,
            delay: Duration::from_secs(self.db.retry_delay_secs),
        };

        match connect_with_retry(&policy, |attempt| self.attempt_connect(attempt)).await {
            Ok(pool) => {
                *self.state.write().await = ConnectionState::Ready(pool);
                tracing::info!("Connected to MySQL database");
            }
            Err(err) => {
                *self.state.write().await = ConnectionState::Disconnected;
                let message = format!(
                    "Database unreachable after {} attempts: {}",
                    policy.max_attempts, err
                );
                tracing::error!(
                    error = %err,
                    attempts = policy.max_attempts,
                    "Giving up on database connection"
                );
                let _ = self.fatal_tx.send(Some(message));
            }
        }
    }

    async fn attempt_connect(&self, attempt: u32) -> anyhow::Result<MySqlPool> {
        tracing::info!(attempt, "Connecting to MySQL database");

        let connect = MySqlPoolOptions::new()
            .max_connections(self.db.max_connections)
            .acquire_timeout(Duration::from_secs(self.db.acquire_timeout_secs))
            .connect_with(self.options.clone());

        let pool = match timeout(Duration::from_secs(self.db.connect_timeout_secs), connect).await
        {
            Ok(result) => result.context("Failed to connect to MySQL")?,
            Err(_) => anyhow::bail!(
                "Connection attempt timed out after {}s",
                self.db.connect_timeout_secs
            ),
        };

        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to apply database migrations")?;

        Ok(pool)
    }

    async fn handle_fatal(self: Arc<Self>) {
        let stale = {
            let mut state = self.state.write().await;
            match std::mem::replace(&mut *state, ConnectionState::Connecting) {
                ConnectionState::Ready(pool) => Some(pool),
                // A reconnect is already in flight
                other => {
                    *state = other;
                    None
                }
            }
        };

        let pool = match stale {
            Some(pool) => pool,
            None => return,
        };

        tracing::warn!("Database connection lost, entering reconnect cycle");
        pool.close().await;
        self.run_connect_cycle().await;
    }
}

/// Whether a store error means the connection itself is gone
///
/// Transient errors (pool acquire timeouts, decode failures, constraint
/// violations) leave the manager `Ready`.
pub fn is_fatal_store_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

fn connect_options(config: &Config) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.mysql_host)
        .port(config.mysql_port)
        .username(&config.mysql_user)
        .password(&config.mysql_password)
        .database(&config.mysql_database)
}

/// Run `attempt` until it succeeds or the budget is spent
///
/// Each failed attempt is logged and retried after the policy delay. The
/// attempt counter starts fresh on every cycle, so a successful
/// reconnection resets the budget.
pub(crate) async fn connect_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempts = 0;
    loop {
        attempts += 1;
        match attempt(attempts).await {
            Ok(value) => return Ok(value),
            Err(err) if attempts >= policy.max_attempts => return Err(err),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    attempt = attempts,
                    max_attempts = policy.max_attempts,
                    "Database connection attempt failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            mysql_host: "127.0.0.1".to_string(),
            mysql_user: "contact".to_string(),
            mysql_password: "contact".to_string(),
            mysql_database: "contact_test".to_string(),
            // Nothing listens here; connect attempts must fail
            mysql_port: 1,
            port: 5000,
            frontend_url: None,
            rust_log: "info".to_string(),
            db: DbConfig {
                max_connections: 2,
                acquire_timeout_secs: 1,
                connect_timeout_secs: 1,
                retry_delay_secs: 1,
                max_connect_attempts: 2,
            },
        }
    }

    #[tokio::test]
    async fn test_acquire_fails_while_disconnected() {
        let manager = ConnectionManager::new(&test_config());

        assert!(!manager.is_ready().await);
        assert_eq!(manager.state_label().await, "disconnected");
        assert!(matches!(
            manager.acquire().await,
            Err(AppError::Unavailable)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_transient_failures() {
        let policy = RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        };

        let mut observed = Vec::new();
        let result = connect_with_retry(&policy, |attempt| {
            observed.push(attempt);
            async move {
                if attempt < 3 {
                    Err("connection refused")
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(observed, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_attempt_budget() {
        let policy = RetryPolicy {
            max_attempts: 10,
            delay: Duration::from_secs(5),
        };

        let mut attempts = 0u32;
        let result: Result<(), &str> = connect_with_retry(&policy, |_| {
            attempts += 1;
            async { Err("access denied") }
        })
        .await;

        assert_eq!(result, Err("access denied"));
        assert_eq!(attempts, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_cycle_signals_fatal_instead_of_exiting() {
        let manager = ConnectionManager::new(&test_config());
        let mut fatal_rx = manager.fatal_signal();

        manager.clone().run_connect_cycle().await;

        assert_eq!(manager.state_label().await, "disconnected");
        assert!(fatal_rx.has_changed().unwrap());
        let reason = manager.fatal_reason().unwrap();
        assert!(reason.contains("2 attempts"));
    }

    #[test]
    fn test_fatal_store_error_classification() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert!(is_fatal_store_error(&io));
        assert!(is_fatal_store_error(&sqlx::Error::PoolClosed));

        assert!(!is_fatal_store_error(&sqlx::Error::PoolTimedOut));
        assert!(!is_fatal_store_error(&sqlx::Error::RowNotFound));
    }
}
