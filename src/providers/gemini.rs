use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::{
    LlmProvider, ProviderId, ReplyShape, TextLocation, UpstreamError, endpoint, error_message,
    failure_message, resolve_api_key,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_KEY_ENV: &str = "GOOGLE_AI_KEY";
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

// Gemini does report usageMetadata, but results from this provider have always
// carried zero usage; keep it that way.
const GEMINI_SHAPE: ReplyShape = ReplyShape {
    text: TextLocation::JoinedParts("/candidates/0/content/parts"),
    usage: None,
};

/// Google Gemini `generateContent` API
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    key_env: String,
}

impl GeminiProvider {
    pub fn new(client: Client) -> Self {
        Self::with_config(client, GEMINI_BASE_URL, GEMINI_KEY_ENV)
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

    fn generate_url(&self) -> String {
        endpoint(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", GEMINI_MODEL),
        )
    }
}

// ---------- API request types ----------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: i64,
}

/// `finishReason` values that mean the first candidate was withheld.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

/// Why a reply carries no usable text, if it was blocked.
///
/// A prompt-level block returns no candidates and sets
/// `promptFeedback.blockReason`. A candidate-level block returns a first
/// candidate whose `finishReason` is one of [`BLOCKING_FINISH_REASONS`].
fn blocked_message(reply: &Value) -> Option<String> {
    let first = reply
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first());

    match first {
        Some(candidate) => candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .filter(|reason| BLOCKING_FINISH_REASONS.contains(reason))
            .map(|reason| format!("Text not available. Candidate was blocked due to {}", reason)),
        None => reply
            .pointer("/promptFeedback/blockReason")
            .and_then(Value::as_str)
            .map(|reason| format!("Text not available. Response was blocked due to {}", reason)),
    }
}

// ---------- LlmProvider implementation ----------

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: i64,
    ) -> Result<Value, UpstreamError> {
        let api_key = resolve_api_key(&self.key_env, "Gemini")?;

        let api_request = ApiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: max_tokens,
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&api_request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::new(failure_message(&body, "Gemini")));
        }

        let reply = serde_json::from_str::<Value>(&body).map_err(|err| {
            UpstreamError::new(format!("Failed to parse Gemini API response: {}", err))
        })?;

        if let Some(message) = error_message(&reply) {
            return Err(UpstreamError::new(message));
        }

        if let Some(message) = blocked_message(&reply) {
            return Err(UpstreamError::new(message));
        }

        Ok(reply)
    }

    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn model_id(&self) -> &str {
        GEMINI_MODEL
    }

    fn reply_shape(&self) -> &ReplyShape {
        &GEMINI_SHAPE
    }
}
