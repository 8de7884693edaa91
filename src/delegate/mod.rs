//! Hosted language-model delegate.
//!
//! The assistant asks a delegate for a JSON study card before it falls back
//! to local synthesis. Any error from this module is recovered by the
//! caller; none of it reaches an HTTP client.

pub mod openai;
pub mod parse;

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::model::SchemaViolation;

pub use openai::OpenAiDelegate;
pub use parse::{parse_model_output, strip_code_fences};

#[derive(Debug, Error)]
pub enum DelegateError {
    #[error("delegate request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("delegate answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("delegate returned no completion text")]
    EmptyCompletion,
    #[error("delegate output is not a study card: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("delegate output failed validation: {0}")]
    Schema(#[from] SchemaViolation),
    #[error("delegate did not answer within {0:?}")]
    Timeout(Duration),
}

/// A model that turns a system instruction plus the user's text into raw
/// completion text.
#[async_trait]
pub trait ModelDelegate: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, system: &str, message: &str) -> Result<String, DelegateError>;
}
