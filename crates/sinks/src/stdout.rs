//! Stdout sink - NDJSON debug output
//!
//! Writes each event of a batch as one JSON line in the wire shape.
//! Useful for development and for piping into line-oriented tooling.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use logfan_event::Batch;

use crate::common::{SinkMetrics, SinkMetricsSnapshot};
use crate::error::SinkError;
use crate::sink::{Sink, SinkAck};

/// Sink that writes batches as NDJSON lines to stdout
pub struct StdoutSink {
    metrics: Arc<SinkMetrics>,
}

impl StdoutSink {
    /// Create a stdout sink
    #[must_use]
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    /// Metrics snapshot
    pub fn metrics(&self) -> SinkMetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for StdoutSink {
    async fn put(&self, batch: &Batch) -> Result<SinkAck, SinkError> {
        self.metrics.record_received();

        // Serialize the whole batch first so a mid-batch error never
        // leaves partial lines on stdout.
        let mut out = Vec::with_capacity(batch.total_bytes());
        for event in batch.events() {
            let line = event.to_wire_string()?;
            out.extend_from_slice(line.as_bytes());
            out.push(b'\n');
        }

        let result = {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&out).and_then(|()| stdout.flush())
        };
        if let Err(e) = result {
            self.metrics.record_error();
            return Err(SinkError::Io(e));
        }

        let ack = SinkAck {
            events: batch.count(),
            bytes: out.len(),
        };
        self.metrics
            .record_written(ack.events as u64, ack.bytes as u64);
        Ok(ack)
    }
}
