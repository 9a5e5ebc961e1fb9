//! Route table for O(1) severity→destinations lookup
//!
//! The table is compiled once at startup from configuration. All
//! allocations happen during compilation - the hot path is an array
//! index returning a slice.

use logfan_event::Severity;

use crate::{DestId, Result, RoutingError};

/// Static routing predicate for one destination
///
/// Matches the full event stream (`Always`) or events at or above a
/// severity threshold (`AtLeast`). An alert path is typically
/// `AtLeast(Error)`; an archive path is `Always`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePredicate {
    /// Match every event
    Always,
    /// Match events with severity >= the threshold
    AtLeast(Severity),
}

impl RoutePredicate {
    /// Whether an event of the given severity matches
    #[inline]
    #[must_use]
    pub fn matches(self, severity: Severity) -> bool {
        match self {
            RoutePredicate::Always => true,
            RoutePredicate::AtLeast(threshold) => severity >= threshold,
        }
    }
}

/// Pre-compiled route table
///
/// Stores one destination list per severity level. `route()` is the hot
/// path: an array index, no allocation, no comparison loop.
///
/// Within each per-severity list, destinations appear in registration
/// order, so fan-out order is stable across severities.
#[derive(Debug, Clone)]
pub struct RouteTable {
    /// Matching destinations per severity level, indexed by `Severity::index()`
    by_severity: [Vec<DestId>; Severity::COUNT],

    /// Destination names, indexed by `DestId`
    names: Vec<String>,

    /// Registered predicates, indexed by `DestId`
    predicates: Vec<RoutePredicate>,
}

impl RouteTable {
    /// Destinations matching the given severity
    ///
    /// Returns a slice into pre-allocated storage; may be empty if no
    /// predicate matches.
    #[inline]
    #[must_use]
    pub fn route(&self, severity: Severity) -> &[DestId] {
        &self.by_severity[severity.index()]
    }

    /// Name of a destination (for logs and diagnostics)
    #[inline]
    pub fn name(&self, id: DestId) -> Option<&str> {
        self.names.get(id.as_usize()).map(String::as_str)
    }

    /// Predicate registered for a destination
    #[inline]
    pub fn predicate(&self, id: DestId) -> Option<RoutePredicate> {
        self.predicates.get(id.as_usize()).copied()
    }

    /// Number of registered destinations
    #[inline]
    pub fn dest_count(&self) -> usize {
        self.names.len()
    }

    /// All destination names in registration order
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether no destinations are registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Builder that compiles a `RouteTable` from named rules
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    names: Vec<String>,
    predicates: Vec<RoutePredicate>,
}

impl RouteTableBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination with its routing predicate
    ///
    /// Returns the assigned `DestId`, in registration order.
    ///
    /// # Errors
    ///
    /// Fails if the name is already registered or the destination limit
    /// is exceeded.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: RoutePredicate,
    ) -> Result<DestId> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(RoutingError::duplicate(name));
        }
        if self.names.len() > DestId::MAX as usize {
            return Err(RoutingError::TooManyDestinations);
        }
        let id = DestId::new(self.names.len() as u16);
        self.names.push(name);
        self.predicates.push(predicate);
        Ok(id)
    }

    /// Compile the table
    ///
    /// Evaluates every predicate against every severity level once, so
    /// routing never re-evaluates predicates per event.
    #[must_use]
    pub fn build(self) -> RouteTable {
        let mut by_severity: [Vec<DestId>; Severity::COUNT] = Default::default();
        for severity in Severity::ALL {
            let matching = &mut by_severity[severity.index()];
            for (index, predicate) in self.predicates.iter().enumerate() {
                if predicate.matches(severity) {
                    matching.push(DestId::new(index as u16));
                }
            }
        }
        RouteTable {
            by_severity,
            names: self.names,
            predicates: self.predicates,
        }
    }
}
