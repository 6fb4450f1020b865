pub mod deepseek;
pub mod gemini;
pub mod shape;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::config::TextgenConfig;

pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;
pub use shape::{ReplyShape, TextLocation, UsageLocation};

/// Upstream providers this proxy can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Gemini,
    DeepSeek,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Gemini, ProviderId::DeepSeek];

    /// Wire key used in requests and results ("gemini", "deepseek")
    pub fn key(self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::DeepSeek => "deepseek",
        }
    }

    /// Exact match on the wire key. Unknown keys return `None`; callers decide
    /// whether that means "use the default provider".
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Failure of a single upstream call. The message is the provider's own text
/// whenever the provider supplied one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub message: String,
}

impl UpstreamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Issue exactly one generation call and return the provider's JSON reply as-is.
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: i64,
    ) -> Result<Value, UpstreamError>;

    fn id(&self) -> ProviderId;

    /// Fixed model identifier this provider always calls
    fn model_id(&self) -> &str;

    /// Where text and usage live inside a raw reply
    fn reply_shape(&self) -> &ReplyShape;
}

/// One adapter slot per `ProviderId`.
#[derive(Clone)]
pub struct ProviderSet {
    gemini: Arc<dyn LlmProvider>,
    deepseek: Arc<dyn LlmProvider>,
}

impl ProviderSet {
    pub fn new(gemini: Arc<dyn LlmProvider>, deepseek: Arc<dyn LlmProvider>) -> Self {
        Self { gemini, deepseek }
    }

    /// Build the real HTTP adapters from configuration.
    pub fn from_config(config: &TextgenConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.server.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let gemini = config.provider(ProviderId::Gemini);
        let deepseek = config.provider(ProviderId::DeepSeek);

        Ok(Self::new(
            Arc::new(GeminiProvider::with_config(
                client.clone(),
                gemini.base_url,
                gemini.key_env,
            )),
            Arc::new(DeepSeekProvider::with_config(
                client,
                deepseek.base_url,
                deepseek.key_env,
            )),
        ))
    }

    pub fn get(&self, id: ProviderId) -> &Arc<dyn LlmProvider> {
        match id {
            ProviderId::Gemini => &self.gemini,
            ProviderId::DeepSeek => &self.deepseek,
        }
    }
}

/// Read a provider credential from the environment. Called on every request so
/// a rotated key is picked up without a restart.
pub(crate) fn resolve_api_key(key_env: &str, provider_name: &str) -> Result<String, UpstreamError> {
    match std::env::var(key_env) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(UpstreamError::new(format!(
            "{} API key not found. Set the {} environment variable.",
            provider_name, key_env
        ))),
    }
}

/// The `error.message` field both providers use for their error payloads.
pub(crate) fn error_message(body: &Value) -> Option<&str> {
    body.pointer("/error/message").and_then(Value::as_str)
}

/// Message for a non-2xx reply: the provider's own `error.message` when the
/// body carries one, otherwise `"<Provider> API error"`.
pub(crate) fn failure_message(body: &str, provider_name: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(error_message)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} API error", provider_name))
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
