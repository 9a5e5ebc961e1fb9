//! Immutable flush snapshots
//!
//! A `Batch` is the unit of delivery: the drained contents of one buffer,
//! tagged with its destination and the reason the flush fired. Batches are
//! never mutated after creation; retries re-send the identical batch.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Why a buffer was drained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    /// Event-count or byte threshold reached
    Size,
    /// Oldest buffered event exceeded the configured max age
    Age,
    /// Explicit drain (`flush_all`, shutdown)
    Manual,
}

impl FlushReason {
    /// Lowercase name for logs and metrics
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FlushReason::Size => "size",
            FlushReason::Age => "age",
            FlushReason::Manual => "manual",
        }
    }
}

impl fmt::Display for FlushReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of a buffer's contents at flush time
///
/// Event order equals arrival order at buffer-append time. Sinks that need
/// timestamp order (e.g. strictly increasing sequence tokens) sort as a
/// sink-specific post-processing step.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    destination: String,
    events: Vec<Event>,
    reason: FlushReason,
    total_bytes: usize,
    created_at: DateTime<Utc>,
}

impl Batch {
    /// Create a batch from drained buffer contents
    pub fn new(destination: impl Into<String>, events: Vec<Event>, reason: FlushReason) -> Self {
        let total_bytes = events.iter().map(Event::approx_size).sum();
        Self {
            destination: destination.into(),
            events,
            reason,
            total_bytes,
            created_at: Utc::now(),
        }
    }

    /// Destination this batch is addressed to
    #[inline]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The drained events, in arrival order
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the batch
    #[inline]
    pub fn count(&self) -> usize {
        self.events.len()
    }

    /// Approximate total size in bytes (sum of `Event::approx_size`)
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Why the flush fired
    #[inline]
    pub fn reason(&self) -> FlushReason {
        self.reason
    }

    /// When the snapshot was taken
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the batch holds no events
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the batch, yielding its events
    #[inline]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
