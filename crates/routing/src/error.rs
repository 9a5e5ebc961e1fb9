//! Routing error types

use thiserror::Error;

use crate::DestId;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur during route table compilation
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A destination name was registered twice
    #[error("duplicate destination '{name}'")]
    DuplicateDestination {
        /// Name registered more than once
        name: String,
    },

    /// The destination limit was exceeded
    #[error("too many destinations (limit {})", DestId::MAX)]
    TooManyDestinations,
}

impl RoutingError {
    /// Create a DuplicateDestination error
    #[inline]
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateDestination { name: name.into() }
    }
}
