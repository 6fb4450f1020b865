use anyhow::Result;

use crate::core::catalog::{self, PRESET_PROMPTS};
use crate::core::config::TextgenConfig;
use crate::core::style;

pub async fn run(config: TextgenConfig) -> Result<()> {
    let default_provider = config.default_provider();

    eprintln!("{}", style::header("Providers"));
    for info in catalog::all_providers() {
        println!(
            "{}",
            style::provider_line(
                info.id.key(),
                info.name,
                info.model,
                info.id == default_provider
            )
        );
        eprintln!("             {}", style::hint(info.description));

        let key_env = config.provider(info.id).key_env;
        let key_set = std::env::var(&key_env).is_ok_and(|key| !key.trim().is_empty());
        if key_set {
            eprintln!("             {}", style::success(&format!("{} is set", key_env)));
        } else {
            eprintln!(
                "             {}",
                style::warning(&format!("{} is not set", key_env))
            );
        }
    }

    eprintln!();
    eprintln!("{}", style::header("Preset prompts"));
    for preset in PRESET_PROMPTS {
        eprintln!("  {}", preset);
    }

    Ok(())
}
