//! Logfan - Sinks
//!
//! The delivery side of the router: the `Sink` contract, the
//! transient/permanent error taxonomy, and the bounded-retry layer that
//! wraps every delivery attempt.
//!
//! # Architecture
//!
//! ```text
//! [Router worker] --Batch--> [RetryManager] --put()--> [Sink]
//!                                |  transient error: backoff + retry
//!                                |  permanent error / exhausted:
//!                                `--> DeliveryFailed (reported upward)
//! ```
//!
//! Anything implementing `Sink` is a valid destination: log-group writers,
//! object stores, queues, search indexes. This crate ships two in-process
//! reference implementations:
//!
//! | Sink | Purpose |
//! |------|---------|
//! | `MemorySink` | collects batches in memory (tests, benchmarks) |
//! | `StdoutSink` | writes the JSON wire shape as NDJSON lines |

mod common;
mod error;
mod memory;
mod retry;
mod sink;
mod stdout;

pub use common::{SinkMetrics, SinkMetricsSnapshot};
pub use error::{DeliveryFailed, SinkError};
pub use memory::MemorySink;
pub use retry::{RetryManager, RetryPolicy};
pub use sink::{Sink, SinkAck};
pub use stdout::StdoutSink;

#[cfg(test)]
mod retry_test;
