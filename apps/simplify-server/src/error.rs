//! Error types for the simplification server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use simplify_core::{ServiceError, SimplifyError};
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Another operation is already running on this session")]
    EditInProgress,

    #[error("Artifacts are stale; regenerate them first")]
    ArtifactsStale,

    #[error(transparent)]
    Simplify(#[from] SimplifyError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
    /// Cleaned service output for decode and validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
}

impl ServerError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ServerError::EditInProgress => (StatusCode::CONFLICT, "EDIT_IN_PROGRESS"),
            ServerError::ArtifactsStale => (StatusCode::CONFLICT, "ARTIFACTS_STALE"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ServerError::Simplify(err) => match err {
                SimplifyError::Extraction(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                }
                SimplifyError::EmptyInstruction => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "EMPTY_INSTRUCTION")
                }
                SimplifyError::Service(ServiceError::Timeout(_)) => {
                    (StatusCode::GATEWAY_TIMEOUT, "SERVICE_TIMEOUT")
                }
                SimplifyError::Service(_) => (StatusCode::BAD_GATEWAY, "SERVICE_ERROR"),
                SimplifyError::Decode { .. } => (StatusCode::BAD_GATEWAY, "DECODE_ERROR"),
                SimplifyError::Validation { .. } => (StatusCode::BAD_GATEWAY, "VALIDATION_ERROR"),
                SimplifyError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
                SimplifyError::NoDocument => (StatusCode::CONFLICT, "NO_DOCUMENT"),
                SimplifyError::AlreadySimplified => (StatusCode::CONFLICT, "ALREADY_SIMPLIFIED"),
                SimplifyError::SectionOutOfRange { .. } => {
                    (StatusCode::BAD_REQUEST, "SECTION_OUT_OF_RANGE")
                }
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::warn!("{} ({}): {}", code, status.as_u16(), self);
        }

        let raw = match &self {
            ServerError::Simplify(err) => err.raw_response().map(str::to_string),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
            raw,
        };

        (status, Json(body)).into_response()
    }
}
