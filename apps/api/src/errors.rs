use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const QUOTA_EXHAUSTED_MESSAGE: &str = "AI credits exhausted. Please add credits to continue.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "AI analysis failed";
pub const NO_JSON_OBJECT_MESSAGE: &str = "Invalid AI response format";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to continue.")]
    QuotaExhausted,

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    /// Object store write failed. The payload is the user-facing message.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database read or write failed. The payload is the user-facing message;
    /// driver details are logged where the failure happens.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::QuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            AppError::UpstreamFailure(_)
            | AppError::MalformedResponse(_)
            | AppError::Storage(_)
            | AppError::Persistence(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RateLimited => "RATE_LIMITED",
            AppError::QuotaExhausted => "QUOTA_EXHAUSTED",
            AppError::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Persistence(_) => "PERSISTENCE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the caller.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
            AppError::QuotaExhausted => QUOTA_EXHAUSTED_MESSAGE.to_string(),
            AppError::UpstreamFailure(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::MalformedResponse(msg)
            | AppError::Storage(msg)
            | AppError::Persistence(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status: 429, .. } => AppError::RateLimited,
            LlmError::Api { status: 402, .. } => AppError::QuotaExhausted,
            LlmError::Api { status, message } => {
                AppError::UpstreamFailure(format!("status {status}: {message}"))
            }
            LlmError::Http(e) => AppError::UpstreamFailure(e.to_string()),
            LlmError::EmptyContent => {
                AppError::MalformedResponse(NO_JSON_OBJECT_MESSAGE.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::UpstreamFailure(detail) => tracing::error!("Upstream error: {detail}"),
            AppError::MalformedResponse(detail) => tracing::error!("Malformed AI response: {detail}"),
            AppError::Storage(msg) => tracing::error!("Storage error: {msg}"),
            AppError::Persistence(msg) => tracing::error!("Persistence error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::RateLimited | AppError::QuotaExhausted => {
                tracing::warn!(status = status.as_u16(), "Upstream refused request")
            }
            _ => {}
        }

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
