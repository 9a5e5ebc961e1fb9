//! Router error types

use logfan_event::MalformedEvent;
use thiserror::Error;

/// Result type for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced by [`SinkRouter`](crate::SinkRouter) operations
#[derive(Debug, Error)]
pub enum RouterError {
    /// The submitted event failed structural validation
    #[error(transparent)]
    Malformed(#[from] MalformedEvent),

    /// The router has been shut down and accepts no further events
    #[error("router is closed")]
    Closed,

    /// Shutdown exceeded its deadline with events still undelivered
    #[error("flush deadline exceeded with {undelivered} event(s) undelivered")]
    FlushTimeout { undelivered: usize },
}
