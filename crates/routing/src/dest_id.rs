//! Destination identifier type
//!
//! `DestId` is a lightweight, Copy identifier for configured destinations.
//! Designed for zero-copy fan-out in the submit hot path.

use std::fmt;

/// Destination identifier for routing
///
/// A small handle that identifies one configured destination. Assigned
/// sequentially during route table compilation and used for O(1) array
/// indexing into the router's per-destination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestId(u16);

impl DestId {
    /// Maximum number of destinations supported
    pub const MAX: u16 = u16::MAX;

    /// Create a destination ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Numeric index of this destination
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    /// Index as usize (for array indexing)
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dest:{}", self.0)
    }
}

impl From<u16> for DestId {
    #[inline]
    fn from(index: u16) -> Self {
        Self::new(index)
    }
}

impl From<DestId> for usize {
    #[inline]
    fn from(id: DestId) -> Self {
        id.0 as usize
    }
}
