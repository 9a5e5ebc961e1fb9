//! Shared sink metrics
//!
//! Atomic counters updated by sink implementations. Relaxed ordering;
//! values are eventually consistent, not real-time.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by sink implementations
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Total batches received via `put`
    batches_received: AtomicU64,

    /// Batches committed successfully
    batches_written: AtomicU64,

    /// Events committed (sum of batch counts)
    events_written: AtomicU64,

    /// Bytes committed (approximate)
    bytes_written: AtomicU64,

    /// Failed `put` calls
    write_errors: AtomicU64,
}

impl SinkMetrics {
    /// Create a metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            batches_received: AtomicU64::new(0),
            batches_written: AtomicU64::new(0),
            events_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record a batch arriving at the sink
    #[inline]
    pub fn record_received(&self) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a committed batch
    #[inline]
    pub fn record_written(&self, events: u64, bytes: u64) {
        self.batches_written.fetch_add(1, Ordering::Relaxed);
        self.events_written.fetch_add(events, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a failed `put`
    #[inline]
    pub fn record_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            batches_received: self.batches_received.load(Ordering::Relaxed),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            events_written: self.events_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkMetricsSnapshot {
    pub batches_received: u64,
    pub batches_written: u64,
    pub events_written: u64,
    pub bytes_written: u64,
    pub write_errors: u64,
}
