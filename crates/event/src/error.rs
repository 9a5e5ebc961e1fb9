//! Event validation errors

use thiserror::Error;

/// A caller error detected by basic event validation
///
/// Malformed events are rejected synchronously by `SinkRouter::submit`
/// and are never buffered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed event: {reason}")]
pub struct MalformedEvent {
    /// What failed validation
    pub reason: &'static str,
}

impl MalformedEvent {
    /// Create a new validation error
    #[inline]
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}
