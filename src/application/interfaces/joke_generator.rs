use async_trait::async_trait;

use crate::domain::DomainError;

/// Produces a joke for a topic with a single outbound call to a text
/// generation backend.
///
/// Implementations classify quota/rate refusals as
/// [`DomainError::RateLimited`] so callers can retry them; every other
/// failure is returned as-is and is not retried.
#[async_trait]
pub trait JokeGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> Result<String, DomainError>;

    /// Backend name, for logging.
    fn name(&self) -> &str;
}
