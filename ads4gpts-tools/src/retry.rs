//! Retry policy for ad API calls.
//!
//! The default policy makes exactly one attempt. [`RetryPolicy::for_ads_api`]
//! makes up to five with exponential backoff starting at 200ms, and wraps
//! the final failure as [`AdError::Exhausted`].

use ads4gpts_core::AdError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Which failures are worth another attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryCondition {
    /// Retry every failure.
    #[default]
    Always,
    /// Retry only transport failures, 429 and 5xx.
    Transient,
}

impl RetryCondition {
    /// Whether `error` should be retried.
    #[must_use]
    pub fn should_retry(&self, error: &AdError) -> bool {
        match self {
            Self::Always => !error.is_fatal(),
            Self::Transient => error.is_retryable(),
        }
    }
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Factor applied to the delay after every failed attempt.
    pub multiplier: f64,
    /// Upper bound on a single delay.
    pub max_delay: Duration,
    /// Which failures to retry.
    pub retry_on: RetryCondition,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
            retry_on: RetryCondition::Always,
        }
    }

    /// Five attempts, waiting `0.2s * 2^(attempt-1)` between them.
    #[must_use]
    pub fn for_ads_api() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            multiplier: 2.0,
            max_delay: Duration::from_secs(10),
            retry_on: RetryCondition::Always,
        }
    }

    /// Set the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the first delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the growth factor.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Cap a single delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the retry condition.
    #[must_use]
    pub fn with_retry_on(mut self, condition: RetryCondition) -> Self {
        self.retry_on = condition;
        self
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay after the given failed attempt (1-indexed).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(30) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exp);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay);
        delay.min(self.max_delay)
    }

    fn exhausted(&self, attempt: u32, error: AdError) -> AdError {
        let max_attempts = self.attempts();
        if max_attempts > 1 && attempt >= max_attempts && !error.is_fatal() {
            AdError::Exhausted {
                attempts: attempt,
                last: Box::new(error),
            }
        } else {
            error
        }
    }

    /// Run an async operation under this policy.
    ///
    /// # Errors
    ///
    /// Returns the last error, wrapped in [`AdError::Exhausted`] when every
    /// one of several allowed attempts failed. An error the retry condition
    /// rejects is returned as is.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, AdError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AdError>>,
    {
        let max_attempts = self.attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= max_attempts || !self.retry_on.should_retry(&error) {
                        return Err(self.exhausted(attempt, error));
                    }
                    let wait = self.delay_for(attempt);
                    warn!(attempt, max_attempts, error = %error, "Ad API attempt failed");
                    debug!(wait_ms = wait.as_millis() as u64, "Waiting before retry");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Run a blocking operation under this policy.
    ///
    /// # Errors
    ///
    /// Same as [`RetryPolicy::run`].
    pub fn run_blocking<F, T>(&self, mut operation: F) -> Result<T, AdError>
    where
        F: FnMut() -> Result<T, AdError>,
    {
        let max_attempts = self.attempts();
        let mut attempt = 0;
        loop {
            attempt += 1;
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= max_attempts || !self.retry_on.should_retry(&error) {
                        return Err(self.exhausted(attempt, error));
                    }
                    let wait = self.delay_for(attempt);
                    warn!(attempt, max_attempts, error = %error, "Ad API attempt failed");
                    debug!(wait_ms = wait.as_millis() as u64, "Waiting before retry");
                    std::thread::sleep(wait);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(n: u32) -> RetryPolicy {
        RetryPolicy::for_ads_api()
            .with_max_attempts(n)
            .with_initial_delay(Duration::from_millis(1))
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::for_ads_api();
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for(4), Duration::from_millis(1600));
    }

    #[test]
    fn test_delay_capped() {
        let policy = RetryPolicy::for_ads_api().with_max_delay(Duration::from_millis(300));
        assert_eq!(policy.delay_for(10), Duration::from_millis(300));
    }

    #[test]
    fn test_default_single_attempt_unwrapped() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = tokio_test::block_on(RetryPolicy::default().run(|| async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AdError::transport("Network error"))
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().to_string(), "Transport error: Network error");
    }

    #[tokio::test]
    async fn test_exhausted_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast(5)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AdError::transport("Network error"))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to fetch after 5 attempts: Transport error: Network error"
        );
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let calls = AtomicU32::new(0);
        let result = fast(5)
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AdError::http(503, "Service Unavailable"))
                } else {
                    Ok("ads")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ads");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_transient_condition_stops_on_client_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast(5)
            .with_retry_on(RetryCondition::Transient)
            .run_blocking(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AdError::http(403, "Forbidden"))
            });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let err = result.unwrap_err();
        assert!(matches!(err, AdError::Http { status: 403, .. }));
        assert_eq!(err.to_string(), "HTTP error: 403 Forbidden");
    }
}
