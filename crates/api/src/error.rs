use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use courier_core::error::CoreError;
use courier_db::StoreError;
use courier_relay::RelayError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error bodies of
/// the form `{ "error": message, "code": CODE }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input rejected before anything was stored or dispatched.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Environment, collection or history persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The outbound request could not be built.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The request body was not the JSON a handler expects.
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Validation ---
            AppError::Core(core) => {
                let code = match core {
                    CoreError::MissingField(_) => "MISSING_FIELD",
                    CoreError::InvalidPayload { .. } => "INVALID_PAYLOAD",
                    CoreError::InvalidMethod(_) => "INVALID_METHOD",
                    CoreError::Validation(_) => "VALIDATION_ERROR",
                };
                (StatusCode::BAD_REQUEST, code, core.to_string())
            }

            AppError::Json(rejection) => {
                let code = match rejection {
                    JsonRejection::JsonSyntaxError(_) => "INVALID_PAYLOAD",
                    JsonRejection::MissingJsonContentType(_) => "UNSUPPORTED_MEDIA_TYPE",
                    _ => "VALIDATION_ERROR",
                };
                let status = match rejection {
                    JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, code, rejection.body_text())
            }

            // --- Persistence ---
            AppError::Store(StoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Store(StoreError::Database(err)) => {
                tracing::error!(error = %err, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }

            // --- Relay ---
            AppError::Relay(err) => {
                tracing::error!(error = %err, "Relay failed before dispatch");
                let body = json!({
                    "error": "Request Failed",
                    "code": "RELAY_ERROR",
                    "details": err.to_string(),
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
