//! Bounded retry with a fixed backoff
//!
//! Used for generation calls whose output varies per call: an attempt that
//! produced unusable output is simply tried again.

use flora_common::config::RetryConfig;
use std::time::{Duration, Instant};

/// Retry bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts (not exponential)
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }
}

/// Run `operation` until it yields `Some`, at most `policy.max_attempts` times
///
/// **Algorithm:**
/// 1. Attempt operation
/// 2. If it yields `Some`, return immediately
/// 3. If attempts remain, sleep `policy.backoff` and go to 1
/// 4. Otherwise return `None`
///
/// There is no sleep after the final attempt. The operation is responsible for
/// logging why an attempt was unusable.
pub async fn retry_fixed<F, Fut, T>(operation_name: &str, policy: RetryPolicy, mut operation: F) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: std::future::Future<Output = Option<T>>,
{
    let start_time = Instant::now();
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            tracing::debug!(operation = operation_name, attempt, "Retrying operation");
        }

        if let Some(result) = operation(attempt).await {
            if attempt > 1 {
                tracing::debug!(
                    operation = operation_name,
                    attempt,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    "Operation succeeded after retry"
                );
            }
            return Some(result);
        }

        if attempt < max_attempts {
            tracing::warn!(
                operation = operation_name,
                attempt,
                max_attempts,
                backoff_ms = policy.backoff.as_millis(),
                "Attempt unusable, will retry after backoff"
            );
            tokio::time::sleep(policy.backoff).await;
        }
    }

    tracing::error!(
        operation = operation_name,
        attempts = max_attempts,
        elapsed_ms = start_time.elapsed().as_millis(),
        "Operation failed: retry attempts exhausted"
    );
    None
}
