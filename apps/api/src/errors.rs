use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single violated field reported by schema validation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every body uses the `{ok: false, error, detail?}` wire shape.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing {0}")]
    MissingConfig(&'static str),

    #[error("ValidationError")]
    Validation(Vec<FieldViolation>),

    /// Upstream rejected the request shape. Carries the rejection message
    /// verbatim so the client sees what the provider said.
    #[error("{0}")]
    UpstreamRejected(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingConfig(key) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"ok": false, "error": format!("Missing {key}")}),
            ),
            AppError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"ok": false, "error": "ValidationError", "detail": violations}),
            ),
            AppError::UpstreamRejected(msg) => {
                tracing::error!("Upstream rejected request: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    json!({"ok": false, "error": msg}),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"ok": false, "error": e.to_string()}),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"ok": false, "error": msg}),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"ok": false, "error": e.to_string()}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_500() {
        let resp = AppError::MissingConfig("OPENAI_API_KEY").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_is_422() {
        let resp =
            AppError::Validation(vec![FieldViolation::new("phases", "missing")]).into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_upstream_rejection_is_400() {
        let resp = AppError::UpstreamRejected("bad request".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_config_message_names_the_variable() {
        let err = AppError::MissingConfig("OPENAI_API_KEY");
        assert_eq!(err.to_string(), "Missing OPENAI_API_KEY");
    }
}
