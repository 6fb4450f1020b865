use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{
    LlmProvider, ProviderId, ReplyShape, TextLocation, UpstreamError, UsageLocation, endpoint,
    error_message, failure_message, resolve_api_key,
};

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_KEY_ENV: &str = "DEEPSEEK_API_KEY";
pub const DEEPSEEK_MODEL: &str = "deepseek-chat";

const CHAT_COMPLETIONS_PATH: &str = "v1/chat/completions";

const DEEPSEEK_SHAPE: ReplyShape = ReplyShape {
    text: TextLocation::Field("/choices/0/message/content"),
    usage: Some(UsageLocation {
        prompt_tokens: "/usage/prompt_tokens",
        completion_tokens: "/usage/completion_tokens",
        total_tokens: "/usage/total_tokens",
    }),
};

/// DeepSeek chat completions API (OpenAI-compatible wire format)
pub struct DeepSeekProvider {
    client: Client,
    base_url: String,
    key_env: String,
}

impl DeepSeekProvider {
    pub fn new(client: Client) -> Self {
        Self::with_config(client, DEEPSEEK_BASE_URL, DEEPSEEK_KEY_ENV)
    }

    pub fn with_config(
        client: Client,
        base_url: impl Into<String>,
        key_env: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            key_env: key_env.into(),
        }
    }
}

// ---------- API request types ----------

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f64,
    max_tokens: i64,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// ---------- LlmProvider implementation ----------

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: i64,
    ) -> Result<Value, UpstreamError> {
        let api_key = resolve_api_key(&self.key_env, "DeepSeek")?;

        let api_request = ApiRequest {
            model: DEEPSEEK_MODEL,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, CHAT_COMPLETIONS_PATH))
            .bearer_auth(api_key)
            .json(&api_request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::new(failure_message(&body, "DeepSeek")));
        }

        let reply = serde_json::from_str::<Value>(&body).map_err(|err| {
            UpstreamError::new(format!("Failed to parse DeepSeek API response: {}", err))
        })?;

        if let Some(message) = error_message(&reply) {
            return Err(UpstreamError::new(message));
        }

        Ok(reply)
    }

    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
    }

    fn model_id(&self) -> &str {
        DEEPSEEK_MODEL
    }

    fn reply_shape(&self) -> &ReplyShape {
        &DEEPSEEK_SHAPE
    }
}
