//! Logfan - Routing
//!
//! Pre-compiled routing rules for O(1) severity→destinations lookup.
//!
//! # Design
//!
//! Routing decisions are made at configuration time, not per-event.
//! `RouteTable` stores a pre-computed destination list per severity level,
//! so the submit hot path does an array index and returns a slice.
//!
//! # Example
//!
//! ```
//! use logfan_event::Severity;
//! use logfan_routing::{RoutePredicate, RouteTableBuilder};
//!
//! let mut builder = RouteTableBuilder::new();
//! let alert = builder
//!     .register("alert", RoutePredicate::AtLeast(Severity::Error))
//!     .unwrap();
//! let archive = builder.register("archive", RoutePredicate::Always).unwrap();
//! let table = builder.build();
//!
//! // An error-class event fans out to both destinations
//! assert_eq!(table.route(Severity::Critical), &[alert, archive]);
//! // A debug event reaches the archive only
//! assert_eq!(table.route(Severity::Debug), &[archive]);
//! ```

mod dest_id;
mod error;
mod table;


pub use dest_id::DestId;
pub use error::{Result, RoutingError};
pub use table::{RoutePredicate, RouteTable, RouteTableBuilder};
