//! Client-side request limiting.
//!
//! Two independent limits gate every provider attempt:
//! - requests per minute, enforced with governor's GCRA limiter
//! - requests in flight, enforced with a Tokio semaphore

use crate::LimitsConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Gate acquired before each provider attempt.
///
/// Cloning shares the underlying limits, so one limiter can be handed to
/// every client of a tick.
///
/// # Example
///
/// ```
/// use mimesis_rate_limit::{LimitsConfig, RequestLimiter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = RequestLimiter::new(&LimitsConfig { rpm: None, max_concurrent: Some(2) });
/// let first = limiter.acquire().await;
/// let second = limiter.acquire().await;
/// assert_eq!(limiter.available_slots(), Some(0));
/// drop((first, second));
/// assert_eq!(limiter.available_slots(), Some(2));
/// # }
/// ```
#[derive(Clone, Default)]
pub struct RequestLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent: Option<Arc<Semaphore>>,
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("rpm_limited", &self.rpm_limiter.is_some())
            .field("available_slots", &self.available_slots())
            .finish()
    }
}

impl RequestLimiter {
    /// Build a limiter from configuration. Zero or absent limits are unlimited.
    pub fn new(config: &LimitsConfig) -> Self {
        let rpm_limiter = config
            .rpm
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))));

        let concurrent = config
            .max_concurrent
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n as usize)));

        Self {
            rpm_limiter,
            concurrent,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Wait until both limits allow another request.
    ///
    /// The rate quota is consumed first so a waiting request does not hold an
    /// in-flight slot.
    pub async fn acquire(&self) -> RequestPermit {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        let permit = match &self.concurrent {
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };
        trace!(slot_held = permit.is_some(), "Request permit acquired");

        RequestPermit { _permit: permit }
    }

    /// Free in-flight slots, or `None` when concurrency is unlimited.
    pub fn available_slots(&self) -> Option<usize> {
        self.concurrent.as_ref().map(|s| s.available_permits())
    }
}

/// RAII guard releasing the in-flight slot on drop.
#[derive(Debug)]
pub struct RequestPermit {
    _permit: Option<OwnedSemaphorePermit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unlimited_never_blocks() {
        let limiter = RequestLimiter::unlimited();
        let permits: Vec<_> = acquire_many(&limiter, 50).await;
        assert_eq!(permits.len(), 50);
        assert_eq!(limiter.available_slots(), None);
    }

    #[tokio::test]
    async fn test_zero_limits_are_unlimited() {
        let limiter = RequestLimiter::new(&LimitsConfig {
            rpm: Some(0),
            max_concurrent: Some(0),
        });
        assert!(limiter.rpm_limiter.is_none());
        assert_eq!(limiter.available_slots(), None);
    }

    #[tokio::test]
    async fn test_slots_are_shared_between_clones() {
        let limiter = RequestLimiter::new(&LimitsConfig {
            rpm: None,
            max_concurrent: Some(1),
        });
        let clone = limiter.clone();
        let held = limiter.acquire().await;
        assert_eq!(clone.available_slots(), Some(0));
        drop(held);
        let _again = clone.acquire().await;
        assert_eq!(limiter.available_slots(), Some(0));
    }

    async fn acquire_many(limiter: &RequestLimiter, n: usize) -> Vec<RequestPermit> {
        let mut permits = Vec::with_capacity(n);
        for _ in 0..n {
            permits.push(limiter.acquire().await);
        }
        permits
    }
}
