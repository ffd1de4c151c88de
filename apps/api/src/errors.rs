use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::scoring::ScoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Input problems map to 4xx, failures of the model service to 5xx.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    Llm(String),

    #[error("{0}")]
    MalformedResponse(String),

    #[error("Scoring timed out after {0}s")]
    Timeout(u64),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat(_) => AppError::UnsupportedFormat(err.to_string()),
            IngestError::Extraction { .. } | IngestError::Decode(_) => {
                AppError::Extraction(err.to_string())
            }
        }
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        match err {
            ScoreError::Scoring(_) => AppError::Llm(err.to_string()),
            ScoreError::MalformedResponse(_) => AppError::MalformedResponse(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::Extraction(msg) => {
                (StatusCode::BAD_REQUEST, "EXTRACTION_ERROR", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed LLM response: {msg}");
                (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE", msg.clone())
            }
            AppError::Timeout(_) => {
                tracing::error!("{self}");
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", self.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
