use thiserror::Error;

/// Classified failure of a dispatch. Every failure ends up in exactly one of
/// these; none carries a partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Caller input is malformed
    #[error("{0}")]
    Validation(String),

    /// Credential missing, invalid or revoked on the server side
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Upstream throttling or exhausted quota
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// Any other upstream failure; the message is the provider's text
    #[error("{0}")]
    Generation(String),
}

impl DispatchError {
    /// The message shown to end users for this category.
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::Validation(_) => "Prompt is required".to_string(),
            DispatchError::Auth(_) => "Invalid API key".to_string(),
            DispatchError::RateLimit(_) => "Rate limit exceeded".to_string(),
            DispatchError::Generation(message) => {
                format!("Failed to generate text: {}", message)
            }
        }
    }
}

/// Map an upstream failure message to its category.
///
/// Case-insensitive substring match, first hit wins: "api key" is checked
/// before "quota" / "rate limit". This depends on upstream wording and breaks
/// silently if a provider rephrases its errors.
pub fn classify(message: impl Into<String>) -> DispatchError {
    let message = message.into();
    let lowered = message.to_lowercase();

    if lowered.contains("api key") {
        DispatchError::Auth(message)
    } else if lowered.contains("quota") || lowered.contains("rate limit") {
        DispatchError::RateLimit(message)
    } else {
        DispatchError::Generation(message)
    }
}
