use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type for the contact service
///
/// Covers the full error taxonomy: validation failures (client's fault,
/// resolved before any store access), missing records, store outages, and
/// store operation failures.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Validation Errors =====
    #[error("All fields are required")]
    MissingField,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid contact id: {0}")]
    InvalidIdentifier(String),

    #[error("Search term must be at least 2 characters")]
    SearchTermTooShort,

    #[error("Invalid JSON payload")]
    InvalidJson,

    // ===== Not-Found Errors =====
    #[error("{0}")]
    NotFound(String),

    // ===== Store Errors =====
    #[error("Database not connected")]
    Unavailable,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // ===== Internal Server Errors =====
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField
            | AppError::InvalidEmail
            | AppError::InvalidIdentifier(_)
            | AppError::SearchTermTooShort
            | AppError::InvalidJson => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingField => "MISSING_FIELD",
            AppError::InvalidEmail => "INVALID_EMAIL",
            AppError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            AppError::SearchTermTooShort => "SEARCH_TERM_TOO_SHORT",
            AppError::InvalidJson => "INVALID_JSON",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unavailable => "DATABASE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a user-friendly error message (without internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingField => "All fields are required".to_string(),
            AppError::InvalidEmail => "Invalid email format".to_string(),
            AppError::InvalidIdentifier(_) => "Contact id must be a positive integer".to_string(),
            AppError::SearchTermTooShort => {
                "Search term must be at least 2 characters".to_string()
            }
            AppError::InvalidJson => "Invalid JSON payload".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Unavailable => "Database not connected".to_string(),
            // Store failures keep the underlying message in the logs only
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::SERVICE_UNAVAILABLE {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Request rejected while store is unavailable"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let response_body = json!({
            "error": self.user_message(),
            "error_code": self.error_code(),
            "status": status.as_u16(),
        });

        (status, axum::Json(response_body)).into_response()
    }
}

// ============================================================================
// Helper functions for creating common errors
// ============================================================================

impl AppError {
    /// Create a not-found error (404)
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Create an internal server error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(AppError::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidEmail.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidIdentifier("abc".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::SearchTermTooShort.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidJson.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors_map_to_server_statuses() {
        assert_eq!(
            AppError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::not_found("Contact with id 7 not found").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_database_message_is_not_exposed() {
        let err = AppError::Database(sqlx::Error::Protocol("secret detail".to_string()));
        assert_eq!(err.user_message(), "Database error occurred");
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_invalid_json_message_is_exact() {
        assert_eq!(AppError::InvalidJson.user_message(), "Invalid JSON payload");
    }
}
