use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::config::TextgenConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::generation::GenerationRequest;
use crate::core::style;

pub async fn run(
    config: TextgenConfig,
    prompt: String,
    provider: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<i64>,
    json: bool,
) -> Result<()> {
    let dispatcher = Dispatcher::from_config(&config)?;

    let request = GenerationRequest {
        prompt,
        temperature: temperature.unwrap_or(config.generation.temperature),
        max_tokens: max_tokens.unwrap_or(config.generation.max_tokens),
        provider,
    };

    let result = match dispatcher.dispatch(request).await {
        Ok(result) => result,
        Err(err) => {
            let message = err.user_message();
            return Err(anyhow::Error::new(err).context(message));
        }
    };

    if json {
        let out = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", result.text);

    eprintln!();
    eprintln!(
        "{}",
        style::success(&format!("Generated with {}", result.model_id.bold()))
    );
    eprintln!("{}", style::summary_line("Provider", result.provider_id.key()));
    // Zero usage means the provider did not report any
    if result.usage.total_tokens > 0 {
        eprintln!("{}", style::summary_line("Usage", &style::usage(&result.usage)));
    } else {
        eprintln!("{}", style::hint("  (usage not reported by provider)"));
    }

    Ok(())
}
