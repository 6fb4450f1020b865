//! Per-provider description of where generated text and token usage live
//! inside a raw reply. The dispatcher reads replies only through these.

use serde_json::Value;

use crate::core::generation::TokenUsage;

/// Location of the generated text in a raw reply (JSON pointers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLocation {
    /// A single string field
    Field(&'static str),
    /// An array of `{ "text": ... }` parts, concatenated in order
    JoinedParts(&'static str),
}

/// JSON pointers to the three usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageLocation {
    pub prompt_tokens: &'static str,
    pub completion_tokens: &'static str,
    pub total_tokens: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyShape {
    pub text: TextLocation,
    /// `None` for providers whose usage is never reported
    pub usage: Option<UsageLocation>,
}

impl ReplyShape {
    /// Generated text, or `None` when the reply has no text at the expected place.
    pub fn text(&self, raw: &Value) -> Option<String> {
        match self.text {
            TextLocation::Field(pointer) => raw.pointer(pointer)?.as_str().map(str::to_string),
            TextLocation::JoinedParts(pointer) => {
                let parts = raw.pointer(pointer)?.as_array()?;
                Some(
                    parts
                        .iter()
                        .filter_map(|part| part.get("text").and_then(Value::as_str))
                        .collect::<String>(),
                )
            }
        }
    }

    /// Token usage; every counter that is missing or not a non-negative
    /// integer reads as zero.
    pub fn usage(&self, raw: &Value) -> TokenUsage {
        let Some(usage) = self.usage else {
            return TokenUsage::default();
        };

        let count = |pointer: &str| raw.pointer(pointer).and_then(Value::as_u64).unwrap_or(0);

        TokenUsage {
            prompt_tokens: count(usage.prompt_tokens),
            completion_tokens: count(usage.completion_tokens),
            total_tokens: count(usage.total_tokens),
        }
    }
}
