//! Error handling for the HTTP API
//!
//! Maps internal task errors to HTTP status codes and a `{"error": "..."}` body.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskhub_core::TaskError;
use thiserror::Error;
use tracing::error;

/// HTTP API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request could not be parsed before reaching the service
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Task(#[from] TaskError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Task(err) => match err {
                TaskError::MissingId => StatusCode::BAD_REQUEST,
                e if e.is_validation() => StatusCode::BAD_REQUEST,
                TaskError::NotFound(_) => StatusCode::NOT_FOUND,
                TaskError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Message sent to the client; store details stay in the logs
    pub fn client_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Task(TaskError::NotFound(_)) => "task not found".to_string(),
            ApiError::Task(TaskError::Timeout(_)) => "request timed out".to_string(),
            ApiError::Task(TaskError::Database(_)) => "internal server error".to_string(),
            ApiError::Task(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::BadRequest("Invalid task ID".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}
