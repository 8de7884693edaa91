use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub use crate::config::ConfigError;
pub use crate::delegate::DelegateError;
pub use crate::model::SchemaViolation;
pub use crate::registry::RegistryError;
pub use crate::synthesis::TemplateError;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Errors that reach an HTTP client. Delegate problems never do; they are
/// absorbed by the local fallback.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request has no usable message")]
    MissingMessage,
    #[error("request body is not JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("request body is JSON null")]
    NullBody,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingMessage => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) | ApiError::NullBody => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::MissingMessage => MESSAGE_REQUIRED,
            ApiError::MalformedBody(_) | ApiError::NullBody => INTERNAL_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        error_response(status, self.public_message())
    }
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
