use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use mediashift_migrate::MigrationError;
use mediashift_world::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`MigrationError`] for engine errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A migration run could not start.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// A conflicting operation is already in flight.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Engine errors ---
            AppError::Migration(err) => classify_migration_error(err),

            // --- HTTP-specific errors ---
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a migration error into an HTTP status, error code, and message.
///
/// The only fatal migration error is a failed world listing, so everything
/// here maps to 502: the problem is the upstream world server, not this
/// service.
fn classify_migration_error(err: &MigrationError) -> (StatusCode, &'static str, String) {
    match err {
        MigrationError::Store(StoreError::Request(req)) => {
            tracing::error!(error = %req, "World server unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "WORLD_UNAVAILABLE",
                "World server unreachable".to_string(),
            )
        }
        MigrationError::Store(StoreError::Api { status, .. }) => {
            tracing::error!(status, "World API rejected a listing");
            (
                StatusCode::BAD_GATEWAY,
                "WORLD_API_ERROR",
                format!("World API answered with status {status}"),
            )
        }
    }
}
