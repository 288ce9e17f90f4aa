use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::ValidationError { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::StorageUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": msg }))
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self);
        } else {
            tracing::debug!("Rejected request: {}: {}", status, self);
        }

        (status, Json(body)).into_response()
    }
}
