use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grocerific_core::error::CoreError;
use grocerific_core::validation::ValidationError;
use grocerific_db::StoreError;

use crate::response::ErrorResponse;

const INTERNAL_MESSAGE: &str = "Internal server error";
const CONNECTION_MESSAGE: &str = "Database connection failed";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for storage
/// faults, and adds the routing failures. Every variant renders as the
/// `{ "success": false, "error": ... }` envelope; storage and internal
/// failures are logged and reported with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `grocerific_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A fault in the storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No action is registered under this name for the request method.
    #[error("Invalid action")]
    InvalidAction,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The store accepted the request but reported that nothing was written.
    #[error("{0}")]
    WriteFailed(&'static str),

    /// The request ran past the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The durable backend has no database configured.
    #[error("Database connection failed")]
    DatabaseUnavailable,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Core(CoreError::Validation(err))
    }
}

impl AppError {
    /// HTTP status and client-facing message for this error.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => {
                    tracing::debug!(entity = %entity, key = %key, "Lookup missed");
                    (StatusCode::NOT_FOUND, format!("{entity} not found"))
                }
                CoreError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            },
            AppError::Store(StoreError::Database(err)) => classify_sqlx_error(err),
            AppError::InvalidAction => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, self.to_string()),
            AppError::WriteFailed(msg) => {
                tracing::error!(error = %msg, "Store reported no rows written");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
            }
            AppError::Timeout => {
                tracing::warn!("Request timed out");
                (StatusCode::REQUEST_TIMEOUT, self.to_string())
            }
            AppError::DatabaseUnavailable => {
                tracing::error!("Durable API called without a configured database");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CONNECTION_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, ErrorResponse::new(message)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and a sanitized message.
///
/// - Connection and pool failures report `Database connection failed`.
/// - Everything else reports `Internal server error`.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    tracing::error!(error = %err, "Database error");
    let message = match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => CONNECTION_MESSAGE,
        _ => INTERNAL_MESSAGE,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_errors_map_to_expected_statuses() {
        assert_eq!(
            AppError::InvalidAction.status_and_message(),
            (StatusCode::BAD_REQUEST, "Invalid action".to_string())
        );
        assert_eq!(
            AppError::MethodNotAllowed.status_and_message(),
            (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
        );
        assert_eq!(
            AppError::Timeout.status_and_message(),
            (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
        );
    }

    #[test]
    fn not_found_hides_the_key() {
        let err = AppError::Core(CoreError::NotFound {
            entity: "Item",
            key: "42".into(),
        });
        assert_eq!(
            err.status_and_message(),
            (StatusCode::NOT_FOUND, "Item not found".to_string())
        );
    }

    #[test]
    fn validation_message_is_passed_through() {
        let err = AppError::from(ValidationError::MissingField("category"));
        assert_eq!(
            err.status_and_message(),
            (StatusCode::BAD_REQUEST, "Field 'category' is required".to_string())
        );
    }

    #[test]
    fn storage_faults_are_generic() {
        let err = AppError::Store(StoreError::Database(sqlx::Error::RowNotFound));
        assert_eq!(
            err.status_and_message(),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
        );

        let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(
            err.status_and_message(),
            (StatusCode::INTERNAL_SERVER_ERROR, "Database connection failed".to_string())
        );
    }
}
