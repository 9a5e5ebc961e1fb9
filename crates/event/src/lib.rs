//! Logfan - Event model
//!
//! This crate provides the foundational types that flow through the router:
//! - `Event` - normalized, immutable log record
//! - `Severity` - totally ordered classification (Debug..Critical)
//! - `Batch` - immutable snapshot of a buffer's contents at flush time
//! - `PartitionKey` / `PartitionKeyExtractor` - deterministic destination
//!   addressing derived from an event's source and timestamp
//!
//! # Design Principles
//!
//! - **Immutable once created**: events and batches expose accessors only
//! - **Pure derivation**: partition keys are deterministic functions of the
//!   event, stable across retries and process restarts
//! - **Wire shape**: `Event::to_wire()` produces the JSON object sinks
//!   serialize (`timestamp`, `level`, `app`, `message`, `exception`,
//!   attributes flattened as top-level string fields)

mod batch;
mod error;
mod event;
mod partition;
mod severity;

pub use batch::{Batch, FlushReason};
pub use error::MalformedEvent;
pub use event::{Event, EventBuilder};
pub use partition::{DateGranularity, PartitionKey, PartitionKeyExtractor};
pub use severity::{Severity, UnknownSeverity};

/// Fallback application name when an event's source is empty
pub const DEFAULT_APP: &str = "unknown";

/// Fixed per-event overhead added to `Event::approx_size()`
///
/// Covers the timestamp, severity tag, and JSON framing that field
/// lengths alone do not account for.
pub const EVENT_SIZE_OVERHEAD: usize = 64;

// Test modules - only compiled during testing
#[cfg(test)]
mod batch_test;
#[cfg(test)]
mod event_test;
