use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use syncbridge_core::error::CoreError;
use syncbridge_platforms::PlatformError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`], [`PlatformError`] and database errors. Implements
/// [`IntoResponse`] to produce consistent `{ "error": ..., "code": ... }`
/// JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `syncbridge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure talking to HubSpot or ClickUp.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

fn internal() -> (StatusCode, &'static str, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        json!("An internal error occurred"),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Configuration(msg) => {
                    tracing::error!(error = %msg, "Configuration error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        json!(msg),
                    )
                }
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", json!(msg)),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", json!(msg))
                }
            },

            // --- Platform errors ---
            AppError::Platform(err) => classify_platform_error(err),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(&err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a platform failure onto the response the caller sees.
///
/// - Upstream non-success statuses are passed through with the upstream body.
/// - Upstream 404 maps to a generic not-found message.
/// - Transport failures map to 502.
fn classify_platform_error(err: PlatformError) -> (StatusCode, &'static str, Value) {
    match err {
        PlatformError::Upstream { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, "UPSTREAM_ERROR", body)
        }
        PlatformError::NotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            json!(PlatformError::NotFound.to_string()),
        ),
        PlatformError::Request(e) => {
            tracing::error!(error = %e, "Upstream request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                json!("Upstream platform could not be reached"),
            )
        }
        PlatformError::UnknownOperation(op) => {
            tracing::error!(operation = %op, "No endpoint for operation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                json!(format!("Unknown operation: {op}")),
            )
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, Value) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            json!("Resource not found"),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
