use serde::Serialize;

use crate::providers::ProviderId;
use crate::providers::deepseek::DEEPSEEK_MODEL;
use crate::providers::gemini::GEMINI_MODEL;

/// Display metadata for a provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: &'static str,
    pub model: &'static str,
    pub description: &'static str,
}

pub fn provider_info(id: ProviderId) -> ProviderInfo {
    match id {
        ProviderId::Gemini => ProviderInfo {
            id,
            name: "Google Gemini",
            model: GEMINI_MODEL,
            description: "Google's advanced language model with strong reasoning capabilities",
        },
        ProviderId::DeepSeek => ProviderInfo {
            id,
            name: "DeepSeek",
            model: DEEPSEEK_MODEL,
            description: "Efficient and capable language model optimized for various tasks",
        },
    }
}

pub fn all_providers() -> Vec<ProviderInfo> {
    ProviderId::ALL.into_iter().map(provider_info).collect()
}

/// Ready-made prompts offered to users who don't want to type one
pub const PRESET_PROMPTS: &[&str] = &[
    "Write a short story about a robot learning to paint",
    "Explain quantum computing in simple terms",
    "Create a product description for a smart water bottle",
    "Write a professional email declining a meeting",
    "Generate creative names for a coffee shop",
];
