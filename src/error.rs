//! Mapping of failures to HTTP responses.
//!
//! Handlers return [`ApiError`]; this is the only place errors are turned into
//! status codes and `{"message": ...}` bodies.

use crate::models::CategoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Not Found";
pub const ITEM_NOT_FOUND_MESSAGE: &str = "Item Not Found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Category(
                CategoryError::Invalid(_)
                | CategoryError::DuplicateId(_)
                | CategoryError::InvalidId(_),
            ) => StatusCode::BAD_REQUEST,
            Self::Category(CategoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Category(CategoryError::Storage(_)) | Self::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The client-facing message. Server errors never leak their detail.
    pub fn message(&self) -> String {
        match self {
            Self::Category(CategoryError::NotFound(_)) => ITEM_NOT_FOUND_MESSAGE.to_string(),
            _ if self.status().is_server_error() => SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        message_response(status, &self.message())
    }
}

pub fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
