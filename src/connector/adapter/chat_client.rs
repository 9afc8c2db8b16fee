use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::DomainError;

/// An interface for sending chat-style prompts to an LLM and receiving text responses.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details.  Consumers (e.g. [`super::PromptedJokeGenerator`]) remain decoupled from
/// any particular provider or HTTP client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a `system` context message followed by a `user` prompt and return
    /// the assistant's response text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, DomainError>;

    fn name(&self) -> &str;
}

/// Map a non-success HTTP response to a [`DomainError`].
///
/// HTTP 429 and Google-style `RESOURCE_EXHAUSTED` bodies are rate limits;
/// everything else is a provider error.
pub(crate) fn status_error(client: &str, status: StatusCode, body: &str) -> DomainError {
    if status == StatusCode::TOO_MANY_REQUESTS || body.contains("RESOURCE_EXHAUSTED") {
        DomainError::rate_limited(format!("{client}: API returned {status}"))
    } else {
        DomainError::provider(format!("{client}: API returned {status}"))
    }
}
