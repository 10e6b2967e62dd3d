//! Uniform-spacing rate limiter
//!
//! Requests are spread evenly over the period instead of being allowed to
//! burst at window boundaries: with 100 requests per 60 seconds every slot is
//! 600 ms after the previous one. The first slot is available immediately.

use crate::config::RateLimitConfig;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Process-wide request limiter shared by every pagination loop of a run
pub struct RateLimiter {
    /// Minimum spacing between two granted slots
    interval: Duration,
    /// Earliest instant the next slot may be granted
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `period`
    pub fn new(max_requests: u32, period: Duration) -> Self {
        Self {
            interval: period / max_requests.max(1),
            next_slot: Mutex::new(None),
        }
    }

    /// Create a limiter from configuration
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::from_secs(config.period_seconds),
        )
    }

    /// Spacing between two consecutive slots
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a request slot is available
    pub async fn acquire(&self) {
        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_slot = Some(slot + self.interval);
            slot
        };

        let now = Instant::now();
        if slot > now {
            tracing::trace!(
                wait_ms = (slot - now).as_millis() as u64,
                "Waiting for rate limit slot"
            );
            tokio::time::sleep_until(slot).await;
        }
    }
}
