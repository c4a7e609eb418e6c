//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::classifier::ClassifierError;
use crate::pipeline::PipelineError;
use crate::vocabulary::EncodeError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Unknown symptom: {0}")]
    UnknownSymptom(String),
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Validation(detail) => {
                (StatusCode::BAD_REQUEST, "VALIDATION", detail.clone())
            }
            ApiError::UnknownSymptom(symptom) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNKNOWN_SYMPTOM",
                format!("Unknown symptom: {symptom}"),
            ),
            ApiError::InvalidInputShape(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_INPUT_SHAPE",
                detail.clone(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(msg) => ApiError::Validation(msg),
            PipelineError::Encode(EncodeError::UnknownSymptom(symptom)) => {
                ApiError::UnknownSymptom(symptom)
            }
            PipelineError::Classifier(e @ ClassifierError::InvalidInputShape { .. }) => {
                ApiError::InvalidInputShape(e.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<crate::db::DatabaseError> for ApiError {
    fn from(err: crate::db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Worker task failed: {err}"))
    }
}
