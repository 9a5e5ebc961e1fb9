//! Sink error taxonomy
//!
//! Every delivery failure is classified as transient (retry with backoff)
//! or permanent (fail immediately). The classification lives on the error
//! itself so the retry layer needs no sink-specific knowledge.

use thiserror::Error;

/// A failed delivery attempt, as reported by a sink
#[derive(Debug, Error)]
pub enum SinkError {
    /// The destination did not respond in time (transient)
    #[error("timeout: {0}")]
    Timeout(String),

    /// The destination was unreachable (transient)
    #[error("connection error: {0}")]
    Connection(String),

    /// The destination is rate-limiting writes (transient)
    #[error("throttled: {0}")]
    Throttled(String),

    /// Local I/O failure (transient)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The destination rejected the payload (permanent)
    #[error("payload rejected: {0}")]
    Rejected(String),

    /// Missing or invalid credentials (permanent)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The destination does not exist (permanent)
    #[error("destination not found: {0}")]
    NotFound(String),

    /// The batch could not be serialized (permanent)
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SinkError {
    /// Whether the retry layer should try again
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SinkError::Timeout(_)
                | SinkError::Connection(_)
                | SinkError::Throttled(_)
                | SinkError::Io(_)
        )
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a throttled error
    pub fn throttled(msg: impl Into<String>) -> Self {
        Self::Throttled(msg.into())
    }

    /// Create a rejected-payload error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Terminal delivery failure
///
/// Emitted after retries are exhausted or a permanent error occurred.
/// The batch is dropped from the core's responsibility; persistence of
/// failed batches is an external collaborator's concern.
#[derive(Debug, Error)]
#[error("delivery to '{destination}' failed after {attempts} attempt(s): {last_error}")]
pub struct DeliveryFailed {
    /// Destination the batch was addressed to
    pub destination: String,

    /// Number of events in the dropped batch
    pub events: usize,

    /// Attempts made before giving up
    pub attempts: u32,

    /// The error from the final attempt
    #[source]
    pub last_error: SinkError,
}
