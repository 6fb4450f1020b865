//! Consistent colored terminal output for the textgen CLI.
//!
//! Colors are automatically disabled when stdout/stderr is not a TTY.

use colored::Colorize;

use crate::core::generation::TokenUsage;

/// Format a header line: "=== Title ==="
pub fn header(title: &str) -> String {
    format!("=== {} ===", title.bold())
}

/// Green checkmark + message (success)
pub fn success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg)
}

/// Yellow warning + message
pub fn warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg)
}

/// Red error + message
pub fn error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg)
}

/// Dim info/hint message
pub fn hint(msg: &str) -> String {
    format!("{}", msg.dimmed())
}

/// Format a key-value summary line with aligned values
pub fn summary_line(key: &str, value: &str) -> String {
    format!("  {:<20} {}", format!("{}:", key).dimmed(), value)
}

/// "2 prompt / 3 completion / 5 total tokens"
pub fn usage(usage: &TokenUsage) -> String {
    format!(
        "{} prompt / {} completion / {} total tokens",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}

/// Provider line for listings: "gemini  Google Gemini (gemini-1.5-flash)"
pub fn provider_line(key: &str, name: &str, model: &str, is_default: bool) -> String {
    let marker = if is_default {
        format!(" {}", "(default)".green())
    } else {
        String::new()
    };
    format!(
        "  {:<10} {} {}{}",
        key.bold().cyan(),
        name,
        format!("({})", model).dimmed(),
        marker
    )
}
