//! Bounded retry of transient provider conditions.

use crate::{RequestLimiter, RetryConfig};
use mimesis_error::{ProviderError, ProviderErrorKind};
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{error, warn};

/// Retry policy for one provider call.
///
/// Each attempt waits on the [`RequestLimiter`] and runs under its own
/// timeout. Rate-limited attempts wait for the provider's reset hint, timed
/// out and disconnected attempts wait a fixed delay. Every other error is
/// returned at once. When attempts run out the transient error becomes
/// [`ProviderErrorKind::RateLimitExhausted`] or
/// [`ProviderErrorKind::TimeoutExhausted`].
///
/// # Examples
///
/// ```
/// use mimesis_rate_limit::{RetryConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new(&RetryConfig::default());
/// let hint = mimesis_rate_limit::parse_reset_hint("2000ms");
/// assert_eq!(policy.rate_limit_wait(hint), Duration::from_millis(2500));
/// assert_eq!(policy.rate_limit_wait(None), Duration::from_millis(1500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    timeout_delay: Duration,
    margin: Duration,
    default_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Build a policy from configuration. At least one attempt is always made.
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            timeout_delay: Duration::from_millis(config.timeout_delay_ms),
            margin: Duration::from_millis(config.rate_limit_margin_ms),
            default_wait: Duration::from_millis(config.default_rate_limit_wait_ms),
        }
    }

    /// Total attempts per call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before retrying a rate-limited attempt, safety margin included.
    pub fn rate_limit_wait(&self, reset_hint: Option<Duration>) -> Duration {
        reset_hint.unwrap_or(self.default_wait) + self.margin
    }

    /// Run `operation` until it succeeds, fails terminally, or attempts run out.
    pub async fn run<T, F, Fut>(
        &self,
        limiter: &RequestLimiter,
        attempt_timeout: Duration,
        mut operation: F,
    ) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = AtomicU32::new(0);
        // Wait before the next attempt, set by `classify` from the last failure.
        let next_wait = AtomicU64::new(duration_ms(self.timeout_delay));
        let next_wait_ms = &next_wait;
        let strategy = std::iter::from_fn(|| {
            Some(Duration::from_millis(next_wait_ms.load(Ordering::Relaxed)))
        })
        .take(self.max_attempts as usize - 1);

        let result = Retry::spawn(strategy, || {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            let call = operation();
            async move {
                let _permit = limiter.acquire().await;
                let outcome = match tokio::time::timeout(attempt_timeout, call).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ProviderError::new(ProviderErrorKind::Timeout)),
                };
                outcome.map_err(|err| self.classify(err, attempt, next_wait_ms))
            }
        })
        .await;

        result.map_err(|err| {
            let attempts = attempts.load(Ordering::Relaxed);
            if err.kind.is_transient() {
                error!(attempts, error = %err.kind, "Retries exhausted");
                ProviderError::new(err.kind.exhausted(attempts))
            } else {
                err
            }
        })
    }

    fn classify(
        &self,
        err: ProviderError,
        attempt: u32,
        next_wait_ms: &AtomicU64,
    ) -> RetryError<ProviderError> {
        let more = attempt < self.max_attempts;
        match err.kind {
            ProviderErrorKind::RateLimited { retry_after_ms } => {
                next_wait_ms.store(retry_after_ms, Ordering::Relaxed);
                if more {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = retry_after_ms,
                        "Rate limited, waiting for reset"
                    );
                }
                RetryError::Transient {
                    err,
                    retry_after: Some(Duration::from_millis(retry_after_ms)),
                }
            }
            ref kind if kind.is_transient() => {
                next_wait_ms.store(duration_ms(self.timeout_delay), Ordering::Relaxed);
                if more {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        wait_ms = duration_ms(self.timeout_delay),
                        error = %kind,
                        "Transient error, will retry"
                    );
                }
                RetryError::Transient {
                    err,
                    retry_after: None,
                }
            }
            _ => {
                warn!(attempt, error = %err.kind, "Permanent error, failing immediately");
                RetryError::Permanent(err)
            }
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
