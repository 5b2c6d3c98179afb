use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use osce_cases::error::CaseError;
use osce_core::error::CoreError;
use osce_practice::error::PracticeError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
    TooManyRequests(String),
    Gone(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            ApiError::Gone(msg) => (StatusCode::GONE, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<PracticeError> for ApiError {
    fn from(e: PracticeError) -> Self {
        tracing::warn!(error = %e, "rejected session call");
        let msg = e.to_string();
        match e {
            PracticeError::InvalidTransition { .. }
            | PracticeError::WrongPhase { .. }
            | PracticeError::NoCaseSelected
            | PracticeError::AlreadyFinished => ApiError::Conflict(msg),
            PracticeError::ReplyPending => ApiError::TooManyRequests(msg),
            PracticeError::EmptyInput | PracticeError::InvalidRubric { .. } => {
                ApiError::BadRequest(msg)
            }
            PracticeError::SessionClosed => ApiError::Gone(msg),
        }
    }
}

impl From<CaseError> for ApiError {
    fn from(e: CaseError) -> Self {
        ApiError::NotFound(e.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
