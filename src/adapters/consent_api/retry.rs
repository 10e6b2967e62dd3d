//! Retry logic with exponential backoff
//!
//! The n-th retry waits `initial_delay * 2^n`, plus up to 20% random jitter,
//! capped at `max_delay`. A `Retry-After` hint from a 429 response raises the
//! delay to at least the requested value.

use crate::config::RetryConfig;
use crate::domain::ApiError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Backoff policy derived from [`RetryConfig`]
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl RetryPolicy {
    /// Create a policy from configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter: config.jitter,
        }
    }

    /// Maximum number of retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before retry number `retry` (1-based), without jitter
    pub fn base_delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.min(31));
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    fn delay_for(&self, retry: u32, error: &ApiError) -> Duration {
        let mut delay = self.base_delay(retry);
        if self.jitter {
            let jitter_factor: f64 = rand::thread_rng().gen_range(0.0..=0.2);
            delay = delay.mul_f64(1.0 + jitter_factor).min(self.max_delay);
        }
        match error.retry_after() {
            Some(retry_after) => delay.max(retry_after),
            None => delay,
        }
    }
}

/// Execute an async request, retrying retryable [`ApiError`]s
///
/// Returns the first success, the first non-retryable error, or the last
/// error once `max_retries` retries are exhausted.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if retry > 0 {
                    tracing::info!(attempts = retry + 1, "Request succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && retry < policy.max_retries => {
                retry += 1;
                let delay = policy.delay_for(retry, &e);

                tracing::warn!(
                    error = %e,
                    attempt = retry,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Request failed, retrying"
                );

                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = retry + 1,
                        "Request failed after all retries were exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "Request failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}
