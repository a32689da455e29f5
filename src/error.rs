use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Blockchain RPC error: {0}")]
    BlockchainRPC(String),

    #[error("External API error: {0}")]
    ExternalAPI(String),

    #[error("LLM provider error: {0}")]
    LlmProvider(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not implemented")]
    NotImplemented,

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to process intent: {0}")]
    IntentProcessing(String),

    #[error("{0}")]
    NotConfigured(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::NotImplemented => (
                status,
                Json(MessageResponse {
                    message: "Method not implemented".to_string(),
                }),
            )
                .into_response(),
            AppError::IntentProcessing(details) => (
                status,
                Json(ErrorResponse {
                    error: "Failed to process intent".to_string(),
                    details: Some(details),
                }),
            )
                .into_response(),
            AppError::BadRequest(message) | AppError::Upstream { message, .. } => (
                status,
                Json(ErrorResponse {
                    error: message,
                    details: None,
                }),
            )
                .into_response(),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    status,
                    Json(ErrorResponse {
                        error: other.to_string(),
                        details: None,
                    }),
                )
                    .into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_keeps_upstream_status() {
        let err = AppError::Upstream {
            status: 429,
            message: "Failed to fetch market data".to_string(),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn validation_and_unimplemented_statuses() {
        assert_eq!(
            AppError::BadRequest("x".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotImplemented.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            AppError::Timeout(30).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_configured_renders_bare_message() {
        let err = AppError::NotConfigured("API key not configured".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "API key not configured");
    }

    #[test]
    fn timeout_message_mentions_seconds() {
        assert_eq!(
            AppError::Timeout(30).to_string(),
            "Request timed out after 30 seconds"
        );
    }
}
