use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::trigger::TriggerError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Messages are sanitized; details only go to the server log.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The runner process could not be started.
    #[error(transparent)]
    Trigger(#[from] TriggerError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Trigger(err) => {
                tracing::error!(error = %err, "Runner could not be started");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RUNNER_UNAVAILABLE",
                    "The runner process could not be started".to_string(),
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
