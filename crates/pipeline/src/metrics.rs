//! Router metrics
//!
//! Atomic counters for tracking router throughput and delivery outcomes.
//! All operations use relaxed ordering; values are eventually consistent,
//! not real-time.

use std::sync::atomic::{AtomicU64, Ordering};

use logfan_event::FlushReason;

/// Metrics for the sink router
///
/// # Thread Safety
///
/// All methods are safe to call from multiple threads concurrently.
/// The atomic operations ensure no data races, though values may be
/// slightly stale when read.
#[derive(Debug, Default)]
pub struct RouterMetrics {
    /// Events accepted by `submit`
    events_received: AtomicU64,

    /// Events rejected as malformed
    events_rejected: AtomicU64,

    /// Events whose severity matched no destination
    events_unrouted: AtomicU64,

    /// Events shed by a drop backpressure policy
    events_dropped: AtomicU64,

    /// Times a blocking submit had to wait for capacity
    backpressure_waits: AtomicU64,

    /// Batches flushed by the size trigger
    flushes_size: AtomicU64,

    /// Batches flushed by the age trigger
    flushes_age: AtomicU64,

    /// Batches flushed manually (flush_all or shutdown)
    flushes_manual: AtomicU64,

    /// Batches acknowledged by a sink
    deliveries_succeeded: AtomicU64,

    /// Batches that exhausted retries or hit a permanent error
    deliveries_failed: AtomicU64,

    /// Events in acknowledged batches
    events_delivered: AtomicU64,

    /// Bytes in acknowledged batches
    bytes_delivered: AtomicU64,
}

impl RouterMetrics {
    /// Create new metrics instance with all counters at zero
    #[inline]
    pub const fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            events_rejected: AtomicU64::new(0),
            events_unrouted: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            backpressure_waits: AtomicU64::new(0),
            flushes_size: AtomicU64::new(0),
            flushes_age: AtomicU64::new(0),
            flushes_manual: AtomicU64::new(0),
            deliveries_succeeded: AtomicU64::new(0),
            deliveries_failed: AtomicU64::new(0),
            events_delivered: AtomicU64::new(0),
            bytes_delivered: AtomicU64::new(0),
        }
    }

    /// Record an event accepted by submit
    #[inline]
    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an event rejected as malformed
    #[inline]
    pub fn record_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an event that matched no destination
    #[inline]
    pub fn record_unrouted(&self) {
        self.events_unrouted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record events shed by a drop policy
    #[inline]
    pub fn record_dropped(&self, count: u64) {
        self.events_dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a blocking submit waiting for capacity
    #[inline]
    pub fn record_backpressure_wait(&self) {
        self.backpressure_waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a batch flush, attributed to its trigger
    #[inline]
    pub fn record_flush(&self, reason: FlushReason) {
        let counter = match reason {
            FlushReason::Size => &self.flushes_size,
            FlushReason::Age => &self.flushes_age,
            FlushReason::Manual => &self.flushes_manual,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a batch acknowledged by a sink
    #[inline]
    pub fn record_delivery_success(&self, events: u64, bytes: u64) {
        self.deliveries_succeeded.fetch_add(1, Ordering::Relaxed);
        self.events_delivered.fetch_add(events, Ordering::Relaxed);
        self.bytes_delivered.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a terminally failed delivery
    #[inline]
    pub fn record_delivery_failure(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    #[inline]
    pub fn snapshot(&self) -> RouterMetricsSnapshot {
        RouterMetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            events_unrouted: self.events_unrouted.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            backpressure_waits: self.backpressure_waits.load(Ordering::Relaxed),
            flushes_size: self.flushes_size.load(Ordering::Relaxed),
            flushes_age: self.flushes_age.load(Ordering::Relaxed),
            flushes_manual: self.flushes_manual.load(Ordering::Relaxed),
            deliveries_succeeded: self.deliveries_succeeded.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
            bytes_delivered: self.bytes_delivered.load(Ordering::Relaxed),
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.events_received.store(0, Ordering::Relaxed);
        self.events_rejected.store(0, Ordering::Relaxed);
        self.events_unrouted.store(0, Ordering::Relaxed);
        self.events_dropped.store(0, Ordering::Relaxed);
        self.backpressure_waits.store(0, Ordering::Relaxed);
        self.flushes_size.store(0, Ordering::Relaxed);
        self.flushes_age.store(0, Ordering::Relaxed);
        self.flushes_manual.store(0, Ordering::Relaxed);
        self.deliveries_succeeded.store(0, Ordering::Relaxed);
        self.deliveries_failed.store(0, Ordering::Relaxed);
        self.events_delivered.store(0, Ordering::Relaxed);
        self.bytes_delivered.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time snapshot of router metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterMetricsSnapshot {
    pub events_received: u64,
    pub events_rejected: u64,
    pub events_unrouted: u64,
    pub events_dropped: u64,
    pub backpressure_waits: u64,
    pub flushes_size: u64,
    pub flushes_age: u64,
    pub flushes_manual: u64,
    pub deliveries_succeeded: u64,
    pub deliveries_failed: u64,
    pub events_delivered: u64,
    pub bytes_delivered: u64,
}

impl RouterMetricsSnapshot {
    /// Delivery success rate (0.0 - 1.0)
    ///
    /// Returns None if no deliveries have completed.
    #[inline]
    pub fn delivery_success_rate(&self) -> Option<f64> {
        let total = self.deliveries_succeeded + self.deliveries_failed;
        if total == 0 {
            None
        } else {
            Some(self.deliveries_succeeded as f64 / total as f64)
        }
    }

    /// Calculate the difference from an earlier snapshot
    ///
    /// Useful for calculating rates over time intervals.
    #[inline]
    pub fn diff(&self, previous: &RouterMetricsSnapshot) -> RouterMetricsSnapshot {
        RouterMetricsSnapshot {
            events_received: self.events_received.saturating_sub(previous.events_received),
            events_rejected: self.events_rejected.saturating_sub(previous.events_rejected),
            events_unrouted: self.events_unrouted.saturating_sub(previous.events_unrouted),
            events_dropped: self.events_dropped.saturating_sub(previous.events_dropped),
            backpressure_waits: self
                .backpressure_waits
                .saturating_sub(previous.backpressure_waits),
            flushes_size: self.flushes_size.saturating_sub(previous.flushes_size),
            flushes_age: self.flushes_age.saturating_sub(previous.flushes_age),
            flushes_manual: self.flushes_manual.saturating_sub(previous.flushes_manual),
            deliveries_succeeded: self
                .deliveries_succeeded
                .saturating_sub(previous.deliveries_succeeded),
            deliveries_failed: self
                .deliveries_failed
                .saturating_sub(previous.deliveries_failed),
            events_delivered: self
                .events_delivered
                .saturating_sub(previous.events_delivered),
            bytes_delivered: self.bytes_delivered.saturating_sub(previous.bytes_delivered),
        }
    }
}

/// Rate-limited drop logging for production visibility
///
/// Aggregates shed events and logs a summary once per second instead of
/// per-event logging. This prevents log spam while ensuring operators
/// see sustained backpressure.
///
/// # Thresholds
///
/// - >0 drops/sec: WARN level
/// - >1000 drops/sec: ERROR level (sinks cannot keep up)
pub struct DropTracker {
    /// Events shed in the current interval
    interval_drops: AtomicU64,
    /// Last log time (epoch milliseconds)
    last_log_ms: AtomicU64,
}

/// Log interval in milliseconds
const LOG_INTERVAL_MS: u64 = 1000;
/// Drops/sec that escalates the summary to ERROR level
const CRITICAL_DROP_THRESHOLD: u64 = 1000;

impl DropTracker {
    /// Create a new tracker
    pub fn new() -> Self {
        Self {
            interval_drops: AtomicU64::new(0),
            last_log_ms: AtomicU64::new(Self::now_ms()),
        }
    }

    /// Record shed events and emit a rate-limited summary
    ///
    /// Returns true if a log line was emitted.
    pub fn record_drop(&self, count: u64) -> bool {
        self.interval_drops.fetch_add(count, Ordering::Relaxed);
        self.maybe_log()
    }

    fn maybe_log(&self) -> bool {
        let now = Self::now_ms();
        let last = self.last_log_ms.load(Ordering::Relaxed);

        if now.saturating_sub(last) < LOG_INTERVAL_MS {
            return false;
        }

        // Claim the log slot so concurrent callers log once
        if self
            .last_log_ms
            .compare_exchange(last, now, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        let drops = self.interval_drops.swap(0, Ordering::Relaxed);
        if drops == 0 {
            return false;
        }

        if drops > CRITICAL_DROP_THRESHOLD {
            tracing::error!(
                dropped_events = drops,
                threshold = CRITICAL_DROP_THRESHOLD,
                "sustained backpressure, sinks cannot keep up"
            );
        } else {
            tracing::warn!(
                dropped_events = drops,
                "backpressure: events shed in last second"
            );
        }

        true
    }

    #[inline]
    fn now_ms() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn current_drops(&self) -> u64 {
        self.interval_drops.load(Ordering::Relaxed)
    }
}

impl Default for DropTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DropTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropTracker")
            .field(
                "interval_drops",
                &self.interval_drops.load(Ordering::Relaxed),
            )
            .finish()
    }
}
