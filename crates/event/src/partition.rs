//! Partition key extraction
//!
//! Derives destination-addressing attributes (application, UTC date) from
//! an event. Extraction is pure and deterministic: the same event always
//! yields the same key, including under retry and across process restarts.
//!
//! Partition keys address a destination's internal organization (object
//! prefixes, log streams, table partitions); they never select which sink
//! receives an event - that is the routing table's job.

use std::fmt;

use chrono::{Datelike, Timelike};

use crate::event::Event;
use crate::DEFAULT_APP;

/// Date truncation granularity for partition keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateGranularity {
    /// Truncate to UTC day (default)
    #[default]
    Day,
    /// Truncate to UTC hour
    Hour,
}

/// Derived routing/addressing attributes for one event
///
/// Computed once from `source` and `timestamp`; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey {
    app: String,
    year: i32,
    month: u32,
    day: u32,
    hour: Option<u32>,
}

impl PartitionKey {
    /// Application component
    #[inline]
    pub fn app(&self) -> &str {
        &self.app
    }

    /// UTC date components `(year, month, day)`
    #[inline]
    pub fn date(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }

    /// UTC hour component, present at `Hour` granularity
    #[inline]
    pub fn hour(&self) -> Option<u32> {
        self.hour
    }

    /// Render as a destination path prefix: `app/YYYY/MM/DD[/HH]`
    ///
    /// Archive-style sinks use this to address objects within a bucket
    /// or stream.
    pub fn path(&self) -> String {
        match self.hour {
            Some(hour) => format!(
                "{}/{:04}/{:02}/{:02}/{:02}",
                self.app, self.year, self.month, self.day, hour
            ),
            None => format!(
                "{}/{:04}/{:02}/{:02}",
                self.app, self.year, self.month, self.day
            ),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Pure extractor of `PartitionKey` from events
///
/// # Example
///
/// ```
/// use logfan_event::{Event, PartitionKeyExtractor, Severity};
///
/// let extractor = PartitionKeyExtractor::new();
/// let event = Event::builder(Severity::Info, "started")
///     .source("billing")
///     .build();
///
/// let key = extractor.extract(&event);
/// assert_eq!(key.app(), "billing");
/// ```
#[derive(Debug, Clone)]
pub struct PartitionKeyExtractor {
    default_app: String,
    granularity: DateGranularity,
}

impl PartitionKeyExtractor {
    /// Create an extractor with day granularity and the `"unknown"` fallback
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_app: DEFAULT_APP.to_string(),
            granularity: DateGranularity::Day,
        }
    }

    /// Set the fallback application name for events with an empty source
    #[must_use]
    pub fn with_default_app(mut self, app: impl Into<String>) -> Self {
        self.default_app = app.into();
        self
    }

    /// Set the date truncation granularity
    #[must_use]
    pub fn with_granularity(mut self, granularity: DateGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Derive the partition key for one event
    ///
    /// Deterministic and pure: no I/O, no clock reads.
    pub fn extract(&self, event: &Event) -> PartitionKey {
        let app = if event.source().is_empty() {
            self.default_app.clone()
        } else {
            event.source().to_string()
        };
        let ts = event.timestamp();
        PartitionKey {
            app,
            year: ts.year(),
            month: ts.month(),
            day: ts.day(),
            hour: match self.granularity {
                DateGranularity::Day => None,
                DateGranularity::Hour => Some(ts.hour()),
            },
        }
    }
}

impl Default for PartitionKeyExtractor {
    fn default() -> Self {
        Self::new()
    }
}
