use std::sync::Arc;

use contact_config::Config;
use contact_db::ConnectionManager;
use contact_error::AppError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: Arc<ConnectionManager>,
}

impl AppState {
    /// Translate a store failure into the client-facing error
    ///
    /// The underlying message stays in the logs; the Connection Manager is
    /// told about the error so a lost connection re-enters its connect
    /// cycle.
    pub fn store_error(&self, operation: &'static str, err: sqlx::Error) -> AppError {
        tracing::error!(error = %err, operation, "Database operation failed");
        self.manager.clone().observe(&err);
        AppError::Database(err)
    }
}
