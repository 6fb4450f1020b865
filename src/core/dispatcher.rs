use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::config::TextgenConfig;
use crate::core::error::{DispatchError, classify};
use crate::core::generation::{GenerationRequest, GenerationResult};
use crate::providers::{ProviderId, ProviderSet, ReplyShape};

/// Single entry point from a `GenerationRequest` to a `GenerationResult`.
///
/// Holds no mutable state; one instance is shared by all concurrent requests.
pub struct Dispatcher {
    providers: ProviderSet,
    default_provider: ProviderId,
}

impl Dispatcher {
    pub fn new(providers: ProviderSet, default_provider: ProviderId) -> Self {
        Self {
            providers,
            default_provider,
        }
    }

    /// Dispatcher over the real HTTP providers described by `config`
    pub fn from_config(config: &TextgenConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            ProviderSet::from_config(config)?,
            config.default_provider(),
        ))
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    /// Provider for a submitted key. Absent or unrecognized keys select the
    /// default provider; this is never an error.
    pub fn resolve_provider(&self, key: Option<&str>) -> ProviderId {
        match key.and_then(ProviderId::parse) {
            Some(id) => id,
            None => {
                debug!(
                    requested = key.unwrap_or("<none>"),
                    fallback = %self.default_provider,
                    "using default provider"
                );
                self.default_provider
            }
        }
    }

    /// Validate, route, call the provider once, and normalize or classify.
    pub async fn dispatch(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResult, DispatchError> {
        if request.prompt.trim().is_empty() {
            return Err(DispatchError::Validation("prompt required".to_string()));
        }

        let provider_id = self.resolve_provider(request.provider.as_deref());
        let provider = self.providers.get(provider_id);

        debug!(
            provider = %provider_id,
            prompt_chars = request.prompt.chars().count(),
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "dispatching generation"
        );

        let raw = match provider
            .generate(&request.prompt, request.temperature, request.max_tokens)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                let classified = classify(err.message);
                warn!(provider = %provider_id, error = %classified, "generation failed");
                return Err(classified);
            }
        };

        let result = normalize(&raw, provider.reply_shape(), provider.model_id(), provider_id);

        info!(
            provider = %provider_id,
            model = %result.model_id,
            prompt_tokens = result.usage.prompt_tokens,
            completion_tokens = result.usage.completion_tokens,
            total_tokens = result.usage.total_tokens,
            "generation complete"
        );

        Ok(result)
    }
}

/// Turn a raw provider reply into a `GenerationResult`.
///
/// Pure: the same reply always yields the same result. Missing text becomes an
/// empty string and missing usage counters become zero.
pub fn normalize(
    raw: &Value,
    shape: &ReplyShape,
    model_id: &str,
    provider_id: ProviderId,
) -> GenerationResult {
    GenerationResult {
        text: shape.text(raw).unwrap_or_default(),
        usage: shape.usage(raw),
        model_id: model_id.to_string(),
        provider_id,
    }
}
