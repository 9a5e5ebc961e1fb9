//! Severity classification
//!
//! `Severity` is a totally ordered enum; routing predicates and alarm
//! thresholds compare against it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered classification of an event's urgency
///
/// The ordering `Debug < Info < Warning < Error < Critical` drives routing:
/// a rule with threshold `Error` matches `Error` and `Critical` events.
///
/// # Example
///
/// ```
/// use logfan_event::Severity;
///
/// assert!(Severity::Critical > Severity::Error);
/// assert!(Severity::Debug < Severity::Info);
/// assert_eq!(Severity::Warning.as_str(), "warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Diagnostic detail, normally archived only
    Debug,
    /// Normal operation
    Info,
    /// Something degraded but the operation succeeded
    Warning,
    /// The operation failed
    Error,
    /// The service is failing
    Critical,
}

impl Severity {
    /// Number of severity levels (for per-level table allocation)
    pub const COUNT: usize = 5;

    /// All levels in ascending order
    pub const ALL: [Severity; Self::COUNT] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Lowercase string name, matching the wire shape's `level` field
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Position in the total order (for array indexing)
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized severity name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {0}")]
pub struct UnknownSeverity(pub String);
