//! Memory sink - collects batches in memory
//!
//! Used as a test double and for benchmarking the router without I/O.
//! Every delivered batch is retained and can be inspected afterwards.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use logfan_event::Batch;

use crate::common::{SinkMetrics, SinkMetricsSnapshot};
use crate::error::SinkError;
use crate::sink::{Sink, SinkAck};

/// Sink that retains every delivered batch
///
/// Clone-able: clones share the same storage, so a test can keep one
/// handle while the router owns another.
///
/// # Example
///
/// ```ignore
/// let sink = MemorySink::new();
/// router_builder.destination("archive", config, Arc::new(sink.clone()));
/// // ... run the router ...
/// assert_eq!(sink.event_count(), expected);
/// ```
#[derive(Clone)]
pub struct MemorySink {
    batches: Arc<Mutex<Vec<Batch>>>,
    metrics: Arc<SinkMetrics>,
}

impl MemorySink {
    /// Create an empty memory sink
    #[must_use]
    pub fn new() -> Self {
        Self {
            batches: Arc::new(Mutex::new(Vec::new())),
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Copy of all delivered batches, in delivery order
    pub fn batches(&self) -> Vec<Batch> {
        self.batches
            .lock()
            .map(|b| b.clone())
            .unwrap_or_default()
    }

    /// Number of delivered batches
    pub fn batch_count(&self) -> usize {
        self.batches.lock().map(|b| b.len()).unwrap_or(0)
    }

    /// Total events across all delivered batches
    pub fn event_count(&self) -> usize {
        self.batches
            .lock()
            .map(|b| b.iter().map(Batch::count).sum())
            .unwrap_or(0)
    }

    /// Metrics snapshot
    pub fn metrics(&self) -> SinkMetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn put(&self, batch: &Batch) -> Result<SinkAck, SinkError> {
        self.metrics.record_received();
        let ack = SinkAck {
            events: batch.count(),
            bytes: batch.total_bytes(),
        };
        let mut batches = self
            .batches
            .lock()
            .map_err(|_| SinkError::Rejected("sink storage poisoned".into()))?;
        batches.push(batch.clone());
        self.metrics
            .record_written(ack.events as u64, ack.bytes as u64);
        Ok(ack)
    }
}
