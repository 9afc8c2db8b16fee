use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{JokeGenerator, RetryPolicy};
use crate::domain::{ConversationState, DomainError};

/// How many fresh generations the dedupe loop tries before giving up.
pub const DEDUPE_ATTEMPTS: u32 = 5;

/// Outcome of a generation request that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    Joke(String),
    /// Dedupe ran out of attempts; this is the last text generated, which
    /// the session has already seen.
    Repeated(String),
    /// Rate-limit retries were exhausted.
    Exhausted,
}

/// Calls the configured [`JokeGenerator`] under a [`RetryPolicy`].
///
/// A rate-limit error that survives every retry is downgraded to
/// [`Generated::Exhausted`]; any other error is propagated unchanged.
pub struct GenerateJokeUseCase {
    generator: Arc<dyn JokeGenerator>,
    retry_policy: RetryPolicy,
    dedupe_attempts: u32,
}

impl GenerateJokeUseCase {
    pub fn new(generator: Arc<dyn JokeGenerator>) -> Self {
        Self {
            generator,
            retry_policy: RetryPolicy::default(),
            dedupe_attempts: DEDUPE_ATTEMPTS,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_dedupe_attempts(mut self, attempts: u32) -> Self {
        self.dedupe_attempts = attempts.max(1);
        self
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub async fn execute(&self, topic: &str) -> Result<Generated, DomainError> {
        debug!("Generating joke via {} for topic: {}", self.generator.name(), topic);

        let result = self
            .retry_policy
            .run(|attempt| {
                debug!("Generation attempt {} for topic: {}", attempt, topic);
                self.generator.generate(topic)
            })
            .await;

        match result {
            Ok(joke) => Ok(Generated::Joke(joke)),
            Err(e) if self.retry_policy.is_retryable(&e) => {
                warn!("{} stayed rate limited, falling back: {}", self.generator.name(), e);
                Ok(Generated::Exhausted)
            }
            Err(e) => Err(e),
        }
    }

    /// Generate a joke the session has not seen yet.
    ///
    /// Tries up to `dedupe_attempts` generations and returns the first one
    /// missing from the state's seen replies. If every attempt collides the
    /// last text is returned as [`Generated::Repeated`]. An exhausted retry
    /// budget ends the loop early.
    pub async fn execute_unseen(
        &self,
        topic: &str,
        state: &ConversationState,
    ) -> Result<Generated, DomainError> {
        let mut last = None;

        for attempt in 1..=self.dedupe_attempts {
            let joke = match self.execute(topic).await? {
                Generated::Joke(joke) => joke,
                other => return Ok(other),
            };

            if !state.has_seen(&joke) {
                if attempt > 1 {
                    info!("Found an unseen joke after {} attempts", attempt);
                }
                return Ok(Generated::Joke(joke));
            }

            debug!("Dedupe attempt {} produced a seen joke", attempt);
            last = Some(joke);
        }

        match last {
            Some(joke) => {
                warn!(
                    "All {} dedupe attempts for '{}' returned seen jokes; repeating one",
                    self.dedupe_attempts, topic
                );
                Ok(Generated::Repeated(joke))
            }
            None => Err(DomainError::internal("dedupe loop ran zero attempts")),
        }
    }
}
