//! Bounded retry with exponential backoff
//!
//! `RetryManager` wraps one delivery attempt chain for one batch: call the
//! sink, retry transient failures with exponential backoff, fail fast on
//! permanent errors, and report exhaustion as a terminal `DeliveryFailed`.
//! Every attempt re-sends the identical batch.

use std::time::Duration;

use logfan_event::Batch;

use crate::error::{DeliveryFailed, SinkError};
use crate::sink::{Sink, SinkAck};

/// Retry policy for one destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum delivery attempts (including the first)
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles per attempt
    pub backoff_base: Duration,

    /// Upper bound on any single backoff delay
    pub backoff_max: Duration,
}

impl RetryPolicy {
    /// Create a policy with explicit limits
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_base: Duration, backoff_max: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
            backoff_max,
        }
    }

    /// Set the maximum number of attempts
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the base backoff delay
    #[must_use]
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Set the backoff delay cap
    #[must_use]
    pub fn with_backoff_max(mut self, max: Duration) -> Self {
        self.backoff_max = max;
        self
    }

    /// Delay applied after failed attempt `attempt` (1-based)
    ///
    /// `base * 2^(attempt-1)`, capped at `backoff_max`.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.backoff_base.saturating_mul(1u32 << exponent);
        delay.min(self.backoff_max)
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, 200ms base, 10s cap
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_millis(200),
            backoff_max: Duration::from_secs(10),
        }
    }
}

/// Delivers batches to a sink under a retry policy
#[derive(Debug, Clone)]
pub struct RetryManager {
    policy: RetryPolicy,
}

impl RetryManager {
    /// Create a manager with the given policy
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The configured policy
    #[inline]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Deliver one batch to one sink
    ///
    /// Transient failures are retried with exponential backoff up to the
    /// attempt limit. A permanent failure ends delivery immediately.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryFailed` carrying the destination, batch size,
    /// attempt count, and the final error.
    pub async fn deliver(&self, batch: &Batch, sink: &dyn Sink) -> Result<SinkAck, DeliveryFailed> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match sink.put(batch).await {
                Ok(ack) => {
                    if attempt > 1 {
                        tracing::debug!(
                            destination = batch.destination(),
                            attempt,
                            events = batch.count(),
                            "delivery succeeded after retry"
                        );
                    }
                    return Ok(ack);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff_for(attempt);
                    tracing::warn!(
                        destination = batch.destination(),
                        attempt,
                        max_attempts,
                        backoff_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient delivery failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    return Err(self.terminal(batch, attempt, e));
                }
            }
        }

        // Unreachable: the loop always returns on the final attempt
        Err(self.terminal(batch, max_attempts, SinkError::timeout("retry loop ended")))
    }

    fn terminal(&self, batch: &Batch, attempts: u32, last_error: SinkError) -> DeliveryFailed {
        tracing::error!(
            destination = batch.destination(),
            attempts,
            events = batch.count(),
            transient = last_error.is_transient(),
            error = %last_error,
            "delivery failed terminally"
        );
        DeliveryFailed {
            destination: batch.destination().to_string(),
            events: batch.count(),
            attempts,
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default()
            .with_backoff_base(Duration::from_millis(100))
            .with_backoff_max(Duration::from_millis(350));

        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(350)); // capped
        assert_eq!(policy.backoff_for(30), Duration::from_millis(350));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_base, Duration::from_millis(200));
    }
}
