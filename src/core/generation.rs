use serde::{Deserialize, Serialize};

use crate::providers::ProviderId;

/// Provider-agnostic generation request.
///
/// `temperature` and `max_tokens` are forwarded exactly as given; the upstream
/// provider validates them.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: i64,
    /// Provider key as submitted. Absent or unknown keys route to the default provider.
    pub provider: Option<String>,
}

/// Token counts for one generation. Zero when the provider does not report them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Normalized result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub usage: TokenUsage,
    #[serde(rename = "model")]
    pub model_id: String,
    #[serde(rename = "provider")]
    pub provider_id: ProviderId,
}
