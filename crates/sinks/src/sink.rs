//! The Sink contract
//!
//! A sink is an external destination capable of durably accepting a batch.
//! The core defines only this capability; how a concrete sink serializes
//! or stores a batch is its own concern.

use async_trait::async_trait;
use logfan_event::Batch;

use crate::error::SinkError;

/// Acknowledgement of a committed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkAck {
    /// Events committed
    pub events: usize,

    /// Bytes committed (sink's own accounting, approximate)
    pub bytes: usize,
}

/// An external destination for batches
///
/// Implementations must tolerate re-delivery of the identical batch:
/// the retry layer re-sends the same snapshot, so sinks either
/// de-duplicate by event identity or accept at-least-once semantics.
///
/// `put` is called from one delivery worker per destination, so a single
/// sink instance never sees concurrent calls for the same destination.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Commit a batch to the destination
    ///
    /// # Errors
    ///
    /// Returns `SinkError`; its transient/permanent classification drives
    /// the retry layer.
    async fn put(&self, batch: &Batch) -> Result<SinkAck, SinkError>;
}
