use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::warn;

use crate::error::{PlatformError, Result};

/// Timeout and backoff applied to every upstream call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Timeout for a single attempt
    pub timeout: Duration,
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Backoff delay cap
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The same timeout without retries, for calls that are not idempotent.
    pub fn single_attempt(mut self) -> Self {
        self.max_attempts = 1;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }
}

/// Runs `operation` under the policy's per-attempt timeout, retrying
/// transient failures with exponential backoff. Non-retryable errors
/// (4xx, not found, decode failures) are returned immediately.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error = PlatformError::Timeout(policy.timeout.as_secs());

    for attempt in 0..attempts {
        match tokio::time::timeout(policy.timeout, operation()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) if !e.is_retryable() => return Err(e),
            Ok(Err(e)) => {
                warn!(
                    "{} failed (attempt {}/{}): {}",
                    operation_name,
                    attempt + 1,
                    attempts,
                    e
                );
                last_error = e;
            }
            Err(_elapsed) => {
                warn!(
                    "{} timed out after {}s (attempt {}/{})",
                    operation_name,
                    policy.timeout.as_secs(),
                    attempt + 1,
                    attempts
                );
                last_error = PlatformError::Timeout(policy.timeout.as_secs());
            }
        }

        if attempt + 1 < attempts {
            sleep(policy.backoff(attempt)).await;
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn unavailable() -> PlatformError {
        PlatformError::Api {
            status: 503,
            message: "busy".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), "flaky", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(unavailable())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_non_retryable_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&RetryPolicy::default(), "missing", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(PlatformError::NotFound) }
        })
        .await;

        assert!(matches!(result, Err(PlatformError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_slow_calls() {
        let policy = RetryPolicy::default().with_timeout(Duration::from_secs(1));
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_retry(&policy, "slow", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                sleep(Duration::from_secs(60)).await;
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(PlatformError::Timeout(1))));
        assert_eq!(calls.load(Ordering::SeqCst), policy.max_attempts);
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(10), Duration::from_secs(5));
    }
}
