//! Destination configuration
//!
//! One section per destination. Everything defaults; a bare
//! `[destinations.archive]` is a valid always-match archive path.

use std::time::Duration;

use logfan_event::Severity;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Policy applied when a destination's pending events exceed the ceiling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Submit waits for delivery capacity (lossless, default)
    #[default]
    Block,
    /// The incoming event is not appended to the saturated buffer
    DropNewest,
    /// The oldest buffered event is evicted to make room
    DropOldest,
}

impl BackpressurePolicy {
    /// Lowercase name for logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BackpressurePolicy::Block => "block",
            BackpressurePolicy::DropNewest => "drop_newest",
            BackpressurePolicy::DropOldest => "drop_oldest",
        }
    }
}

/// Configuration for a single destination
///
/// # Example
///
/// ```toml
/// [destinations.alert]
/// severity_threshold = "error"
/// max_batch_events = 50
/// max_batch_age = "2s"
/// retry_max_attempts = 5
/// backpressure_policy = "drop_oldest"
///
/// [destinations.archive]
/// max_batch_events = 500
/// max_batch_bytes = 1048576
/// max_batch_age = "30s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    /// Minimum severity routed here; absent means every event matches
    pub severity_threshold: Option<Severity>,

    /// Flush when the buffer holds this many events
    /// Default: 500
    pub max_batch_events: usize,

    /// Flush when the buffer holds this many (approximate) bytes
    /// Default: 1 MiB
    pub max_batch_bytes: usize,

    /// Flush when the oldest buffered event is this old
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub max_batch_age: Duration,

    /// Delivery attempts per batch, including the first
    /// Default: 3
    pub retry_max_attempts: u32,

    /// Backoff before the second attempt; doubles per attempt
    /// Default: 200ms
    #[serde(with = "humantime_serde")]
    pub retry_backoff_base: Duration,

    /// Cap on any single backoff delay
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub retry_backoff_max: Duration,

    /// Hard ceiling on pending (buffered + undelivered) events
    /// Default: 10000
    pub backpressure_ceiling: usize,

    /// Policy applied at the ceiling
    /// Default: block
    pub backpressure_policy: BackpressurePolicy,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            severity_threshold: None,
            max_batch_events: 500,
            max_batch_bytes: 1024 * 1024,
            max_batch_age: Duration::from_secs(5),
            retry_max_attempts: 3,
            retry_backoff_base: Duration::from_millis(200),
            retry_backoff_max: Duration::from_secs(10),
            backpressure_ceiling: 10_000,
            backpressure_policy: BackpressurePolicy::Block,
        }
    }
}

impl DestinationConfig {
    /// Validate this destination's fields
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the destination and field.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.max_batch_events == 0 {
            return Err(ConfigError::invalid(name, "max_batch_events must be > 0"));
        }
        if self.max_batch_bytes == 0 {
            return Err(ConfigError::invalid(name, "max_batch_bytes must be > 0"));
        }
        if self.max_batch_age.is_zero() {
            return Err(ConfigError::invalid(name, "max_batch_age must be > 0"));
        }
        if self.retry_max_attempts == 0 {
            return Err(ConfigError::invalid(name, "retry_max_attempts must be >= 1"));
        }
        if self.backpressure_ceiling < self.max_batch_events {
            return Err(ConfigError::invalid(
                name,
                "backpressure_ceiling must be >= max_batch_events",
            ));
        }
        Ok(())
    }
}
