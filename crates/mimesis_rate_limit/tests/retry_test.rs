//! Retry policy behaviour under virtual time.

use mimesis_error::{ProviderError, ProviderErrorKind};
use mimesis_rate_limit::{LimitsConfig, RequestLimiter, RetryConfig, RetryPolicy};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(&RetryConfig {
        max_attempts,
        ..RetryConfig::default()
    })
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhaustion_names_attempts() {
    let calls = Arc::new(AtomicU32::new(0));
    let limiter = RequestLimiter::unlimited();
    let start = Instant::now();

    let result: Result<(), _> = policy(3)
        .run(&limiter, Duration::from_secs(30), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::new(ProviderErrorKind::RateLimited {
                    retry_after_ms: 2500,
                }))
            }
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind, ProviderErrorKind::RateLimitExhausted { attempts: 3 });
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(5000), "{waited:?}");
    assert!(waited < Duration::from_millis(6000), "{waited:?}");
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_attempt_waits_for_reset_hint() {
    let policy = policy(3);
    let wait = policy.rate_limit_wait(mimesis_rate_limit::parse_reset_hint("2000ms"));
    assert_eq!(wait, Duration::from_millis(2500));

    let limiter = RequestLimiter::unlimited();
    let stamps = Arc::new(std::sync::Mutex::new(Vec::new()));
    let start = Instant::now();

    let result = policy
        .run(&limiter, Duration::from_secs(30), || {
            let stamps = Arc::clone(&stamps);
            async move {
                let mut stamps = stamps.lock().unwrap();
                stamps.push(start.elapsed());
                if stamps.len() == 1 {
                    Err(ProviderError::new(ProviderErrorKind::RateLimited {
                        retry_after_ms: wait.as_millis() as u64,
                    }))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    let stamps = stamps.lock().unwrap();
    assert_eq!(stamps.len(), 2);
    assert!(stamps[1] - stamps[0] >= Duration::from_millis(2500), "{stamps:?}");
    assert!(stamps[1] - stamps[0] < Duration::from_millis(3000), "{stamps:?}");
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_wait_does_not_leak_into_timeout_retry() {
    let calls = Arc::new(AtomicU32::new(0));
    let limiter = RequestLimiter::unlimited();
    let start = Instant::now();

    let result = policy(3)
        .run(&limiter, Duration::from_secs(30), || {
            let calls = Arc::clone(&calls);
            async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(ProviderError::new(ProviderErrorKind::RateLimited {
                        retry_after_ms: 4000,
                    })),
                    1 => Err(ProviderError::new(ProviderErrorKind::Timeout)),
                    _ => Ok(()),
                }
            }
        })
        .await;

    result.unwrap();
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(5000), "{waited:?}");
    assert!(waited < Duration::from_millis(5500), "{waited:?}");
}

#[tokio::test(start_paused = true)]
async fn test_slow_attempts_become_timeout_exhausted() {
    let calls = Arc::new(AtomicU32::new(0));
    let limiter = RequestLimiter::unlimited();

    let result: Result<(), _> = policy(2)
        .run(&limiter, Duration::from_secs(1), || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            }
        })
        .await;

    assert_eq!(
        result.unwrap_err().kind,
        ProviderErrorKind::TimeoutExhausted { attempts: 2 }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_connection_failure_is_retried_then_succeeds() {
    let calls = Arc::new(AtomicU32::new(0));
    let limiter = RequestLimiter::unlimited();
    let start = Instant::now();

    let result = policy(5)
        .run(&limiter, Duration::from_secs(30), || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ProviderError::new(ProviderErrorKind::Connection(
                        "connection reset".to_string(),
                    )))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_terminal_errors_are_not_retried() {
    for kind in [
        ProviderErrorKind::Refusal("unsafe".to_string()),
        ProviderErrorKind::Incomplete("max_output_tokens".to_string()),
        ProviderErrorKind::Failed("server_error".to_string()),
    ] {
        let calls = Arc::new(AtomicU32::new(0));
        let limiter = RequestLimiter::unlimited();
        let expected = kind.clone();

        let result: Result<(), _> = policy(5)
            .run(&limiter, Duration::from_secs(30), || {
                let calls = Arc::clone(&calls);
                let kind = kind.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(ProviderError::new(kind))
                }
            })
            .await;

        assert_eq!(result.unwrap_err().kind, expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_attempts_wait_for_limiter_slot() {
    let limiter = RequestLimiter::new(&LimitsConfig {
        rpm: None,
        max_concurrent: Some(1),
    });
    let held = limiter.acquire().await;

    let policy = policy(1);
    let task_limiter = limiter.clone();
    let task = tokio::spawn(async move {
        policy
            .run(&task_limiter, Duration::from_secs(30), || async { Ok::<_, ProviderError>(7) })
            .await
    });

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!task.is_finished());
    drop(held);
    assert_eq!(task.await.unwrap().unwrap(), 7);
}
