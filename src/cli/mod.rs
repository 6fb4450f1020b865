pub mod generate;
pub mod providers;
pub mod serve;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::config::TextgenConfig;

#[derive(Parser)]
#[command(name = "textgen")]
#[command(about = "Text generation proxy for Gemini and DeepSeek with normalized results")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to textgen.toml (default: nearest textgen.toml from the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on, overriding [server].bind
        #[arg(long)]
        bind: Option<String>,
    },

    /// Generate text once and print the result
    Generate {
        /// Prompt text
        prompt: String,

        /// Provider key (gemini, deepseek); unknown keys use the default provider
        #[arg(short, long)]
        provider: Option<String>,

        /// Sampling temperature, forwarded as-is
        #[arg(short, long, allow_negative_numbers = true)]
        temperature: Option<f64>,

        /// Maximum output tokens, forwarded as-is
        #[arg(short, long, allow_negative_numbers = true)]
        max_tokens: Option<i64>,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported providers and their credential status
    Providers,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;

        match self.command {
            Commands::Serve { bind } => serve::run(config, bind).await,
            Commands::Generate {
                prompt,
                provider,
                temperature,
                max_tokens,
                json,
            } => generate::run(config, prompt, provider, temperature, max_tokens, json).await,
            Commands::Providers => providers::run(config).await,
        }
    }
}

fn load_config(explicit: Option<&Path>) -> Result<TextgenConfig> {
    let cwd = std::env::current_dir()?;
    let (config, path) = TextgenConfig::load(explicit, &cwd)?;
    match path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("no textgen.toml found, using defaults"),
    }
    Ok(config)
}
