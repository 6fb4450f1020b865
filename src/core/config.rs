use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::providers::ProviderId;
use crate::providers::deepseek::{DEEPSEEK_BASE_URL, DEEPSEEK_KEY_ENV};
use crate::providers::gemini::{GEMINI_BASE_URL, GEMINI_KEY_ENV};

pub const CONFIG_FILE_NAME: &str = "textgen.toml";

/// Server configuration from textgen.toml. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextgenConfig {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Upper bound on a single upstream call
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Defaults applied to requests that omit a field.
///
/// Temperature and max tokens are not range-checked here; out-of-range values
/// reach the provider unchanged, like any caller-supplied value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub default_provider: String,
    pub temperature: f64,
    pub max_tokens: i64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_provider: ProviderId::Gemini.key().to_string(),
            temperature: 0.7,
            max_tokens: 150,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub gemini: ProviderConfig,
    pub deepseek: ProviderConfig,
}

/// Per-provider overrides. Unset fields fall back to the provider's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub key_env: Option<String>,
}

/// Provider settings with defaults filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub base_url: String,
    pub key_env: String,
}

impl TextgenConfig {
    /// Load and validate configuration from a textgen.toml file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: TextgenConfig =
            toml::from_str(content).context("Failed to parse textgen.toml")?;

        config.validate()?;
        Ok(config)
    }

    /// Find textgen.toml by walking up from the given directory
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load an explicit config file, or the nearest textgen.toml, or defaults.
    pub fn load(explicit: Option<&Path>, start_dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        match Self::find(start_dir) {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if ProviderId::parse(&self.generation.default_provider).is_none() {
            bail!(
                "Invalid default provider '{}' in textgen.toml. Must be one of: {}",
                self.generation.default_provider,
                ProviderId::ALL.map(ProviderId::key).join(", ")
            );
        }

        if self.server.timeout_secs == 0 {
            bail!("Invalid timeout_secs 0 in textgen.toml. Must be greater than 0");
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            bail!(
                "Invalid bind address '{}' in textgen.toml. Expected host:port, e.g. 127.0.0.1:3000",
                self.server.bind
            );
        }

        for id in ProviderId::ALL {
            let provider = self.provider_overrides(id);
            if provider.base_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
                bail!("Empty base_url for provider '{}' in textgen.toml", id);
            }
            if provider.key_env.as_deref().is_some_and(|env| env.trim().is_empty()) {
                bail!("Empty key_env for provider '{}' in textgen.toml", id);
            }
        }

        Ok(())
    }

    /// The provider requests fall back to when they name none, or an unknown one
    pub fn default_provider(&self) -> ProviderId {
        ProviderId::parse(&self.generation.default_provider).unwrap_or(ProviderId::Gemini)
    }

    fn provider_overrides(&self, id: ProviderId) -> &ProviderConfig {
        match id {
            ProviderId::Gemini => &self.providers.gemini,
            ProviderId::DeepSeek => &self.providers.deepseek,
        }
    }

    /// Provider endpoint and credential variable, with defaults filled in
    pub fn provider(&self, id: ProviderId) -> ResolvedProvider {
        let (default_url, default_env) = match id {
            ProviderId::Gemini => (GEMINI_BASE_URL, GEMINI_KEY_ENV),
            ProviderId::DeepSeek => (DEEPSEEK_BASE_URL, DEEPSEEK_KEY_ENV),
        };
        let overrides = self.provider_overrides(id);

        ResolvedProvider {
            base_url: overrides
                .base_url
                .clone()
                .unwrap_or_else(|| default_url.to_string()),
            key_env: overrides
                .key_env
                .clone()
                .unwrap_or_else(|| default_env.to_string()),
        }
    }
}
