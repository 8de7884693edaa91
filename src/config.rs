use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` when no API key is set; requests are then answered locally.
    pub delegate: Option<DelegateConfig>,
    pub delegate_timeout: Duration,
}

impl AppConfig {
    /// Reads settings from the process environment (and `.env`, once
    /// `dotenvy::dotenv()` has run).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                var: "BIND_ADDR",
                value: raw_addr.clone(),
                expected: "socket address",
            })?;

        let delegate_timeout = match var("DELEGATE_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DELEGATE_TIMEOUT_SECS",
                        value: raw,
                        expected: "positive number of seconds",
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let delegate = var("DELEGATE_API_KEY")
            .or_else(|| var("OPENAI_API_KEY"))
            .map(|api_key| DelegateConfig {
                api_key,
                base_url: var("DELEGATE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: var("DELEGATE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            });

        Ok(Self {
            bind_addr,
            delegate,
            delegate_timeout,
        })
    }
}
