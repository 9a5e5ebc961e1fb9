//! Logfan Pipeline - buffered fan-out routing
//!
//! Connects event submission to delivery sinks:
//!
//! ```text
//!                      ┌─────────────┐
//!  submit(Event) ────▶ │ RouteTable   │  severity → matching destinations
//!                      └──────┬──────┘
//!              ┌──────────────┼──────────────┐
//!              ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │ Buffer    │   │ Buffer    │   │ Buffer    │  per destination
//!        └────┬─────┘   └────┬─────┘   └────┬─────┘
//!             │ size/age/manual flush        │
//!             ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │ worker    │   │ worker    │   │ worker    │  serial delivery,
//!        └────┬─────┘   └────┬─────┘   └────┬─────┘  retry w/ backoff
//!             ▼              ▼              ▼
//!            Sink           Sink           Sink
//! ```
//!
//! # Guarantees
//!
//! - An event is appended to every matching buffer exactly once
//! - Batches for one destination are delivered serially, in flush order
//! - `flush_all` returns only after previously queued batches resolve
//! - Delivery is at-least-once; a batch is retried as an identical unit

mod buffer;
mod error;
mod metrics;
mod router;
mod worker;

pub use error::{Result, RouterError};
pub use metrics::{DropTracker, RouterMetrics, RouterMetricsSnapshot};
pub use router::{SinkRouter, SinkRouterBuilder};
