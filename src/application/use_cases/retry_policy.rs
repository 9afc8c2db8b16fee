use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::DomainError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(20);

/// Exponential delay schedule: `initial * factor^(n-1)` before retry `n`,
/// never longer than `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    factor: u32,
    max: Duration,
}

impl Backoff {
    pub fn exponential(initial: Duration, factor: u32, max: Duration) -> Self {
        Self {
            initial,
            factor: factor.max(1),
            max,
        }
    }

    /// Delay to wait before the `retry`-th retry (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        self.initial
            .saturating_mul(self.factor.saturating_pow(exponent))
            .min(self.max)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential(DEFAULT_INITIAL_BACKOFF, 2, DEFAULT_MAX_BACKOFF)
    }
}

/// Only rate-limit refusals are worth waiting out.
pub fn is_rate_limited(error: &DomainError) -> bool {
    error.is_rate_limited()
}

/// Bounded retry around a fallible async operation.
///
/// The operation is attempted at most `max_attempts` times. Between attempts
/// the policy sleeps according to its [`Backoff`]. Errors for which
/// `retryable` returns `false` are returned immediately; when the budget runs
/// out the last retryable error is returned.
#[derive(Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
    retryable: fn(&DomainError) -> bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff, retryable: fn(&DomainError) -> bool) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
            retryable,
        }
    }

    /// Never retries. Used by backends that fail fast.
    pub fn no_retry() -> Self {
        Self::new(1, Backoff::default(), is_rate_limited)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_retryable(&self, error: &DomainError) -> bool {
        (self.retryable)(error)
    }

    /// Run `op` under this policy. `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, DomainError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !self.is_retryable(&e) => return Err(e),
                Err(e) if attempt >= self.max_attempts => {
                    warn!("Giving up after {} attempts: {}", attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.backoff.delay(attempt);
                    warn!(
                        "Attempt {}/{} failed: {}. Retrying in {:?}",
                        attempt, self.max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    debug!("Starting attempt {}", attempt);
                }
            }
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Backoff::default(), is_rate_limited)
    }
}
