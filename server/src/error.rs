//! HTTP error handling.
//!
//! Validation failures become 400 with `{message}`. Storage failures and
//! unreadable request bodies become 500 with `{message, error}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use todo_core::{StorageError, TodoError, ValidationError};

use crate::dto::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The request body was not valid JSON for the expected shape.
    #[error("failed to decode request body: {0}")]
    Decode(String),
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(e) => AppError::Validation(e),
            TodoError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(e) => {
                warn!(error = ?e, "rejected request");
                ErrorResponse {
                    message: e.to_string(),
                    error: None,
                }
            }
            AppError::Storage(e) => {
                error!(operation = %e.operation, error = %e.source, "storage failure");
                ErrorResponse {
                    message: e.message().to_string(),
                    error: Some(e.cause()),
                }
            }
            AppError::Decode(detail) => {
                warn!(error = %detail, "undecodable request body");
                ErrorResponse {
                    message: "Failed to decode request body".to_string(),
                    error: Some(detail),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
