use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::ValidationError;
use crate::report::ReportError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range request body (422)
    Validation { field: Option<String>, message: String },
    /// Root endpoint limit exceeded (429)
    RateLimited,
    /// Pipeline failure; only the coarse tag reaches the client (500)
    Internal { error_type: &'static str },
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            message: err.to_string(),
            field: Some(err.field),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Internal {
            error_type: err.error_type(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": message, "field": field })),
            )
                .into_response(),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "detail": "rate limit exceeded: 10 per 1 minute" })),
            )
                .into_response(),
            ApiError::Internal { error_type } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "internal server error", "error_type": error_type })),
            )
                .into_response(),
        }
    }
}
