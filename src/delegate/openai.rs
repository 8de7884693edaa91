use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DelegateError, ModelDelegate};
use crate::config::DelegateConfig;

/// Chat completions client for OpenAI and compatible servers.
#[derive(Clone)]
pub struct OpenAiDelegate {
    client: Client,
    config: DelegateConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiDelegate {
    pub fn new(config: DelegateConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ModelDelegate for OpenAiDelegate {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, system: &str, message: &str) -> Result<String, DelegateError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
        };

        let response = self
            .client
            .post(self.api_url("/chat/completions"))
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DelegateError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(DelegateError::EmptyCompletion)?;

        debug!(model = %self.config.model, chars = content.len(), "delegate completion received");
        Ok(content)
    }
}
