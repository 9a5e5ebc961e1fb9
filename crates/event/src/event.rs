//! Normalized log record
//!
//! `Event` is the data unit flowing through the router. Events are built
//! once via `EventBuilder` and are immutable afterwards; classification
//! and fan-out clone them into per-destination buffers.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::MalformedEvent;
use crate::severity::Severity;
use crate::{DEFAULT_APP, EVENT_SIZE_OVERHEAD};

/// Wire-shape keys that attributes may not shadow
const RESERVED_KEYS: [&str; 5] = ["timestamp", "level", "app", "message", "exception"];

/// A normalized, immutable log record
///
/// # Example
///
/// ```
/// use logfan_event::{Event, Severity};
///
/// let event = Event::builder(Severity::Error, "connection refused")
///     .source("order-service")
///     .attribute("request_id", "r-42")
///     .build();
///
/// assert_eq!(event.severity(), Severity::Error);
/// assert_eq!(event.source(), "order-service");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// When the event occurred (UTC)
    timestamp: DateTime<Utc>,

    /// Urgency classification
    severity: Severity,

    /// Emitting application or function name
    source: String,

    /// Human-readable description
    message: String,

    /// Free-form structured fields (request id, trace id, ...)
    attributes: BTreeMap<String, String>,

    /// Captured exception text, if any
    raw_exception: Option<String>,
}

impl Event {
    /// Start building an event with the given severity and message
    ///
    /// The timestamp defaults to now; override with `EventBuilder::timestamp`
    /// when replaying or normalizing upstream records.
    pub fn builder(severity: Severity, message: impl Into<String>) -> EventBuilder {
        EventBuilder {
            timestamp: Utc::now(),
            severity,
            source: String::new(),
            message: message.into(),
            attributes: BTreeMap::new(),
            raw_exception: None,
        }
    }

    /// When the event occurred
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Urgency classification
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Emitting application or function name (may be empty)
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Human-readable description
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Free-form structured fields
    #[inline]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Captured exception text, if any
    #[inline]
    pub fn raw_exception(&self) -> Option<&str> {
        self.raw_exception.as_deref()
    }

    /// Basic caller-error validation
    ///
    /// Rejects events with a pre-epoch timestamp or an empty message.
    /// Severity and timestamp cannot be absent in this API, so these are
    /// the recognizable equivalents of a missing field.
    pub fn validate(&self) -> Result<(), MalformedEvent> {
        if self.timestamp.timestamp_millis() < 0 {
            return Err(MalformedEvent::new("timestamp precedes the UNIX epoch"));
        }
        if self.message.is_empty() {
            return Err(MalformedEvent::new("empty message"));
        }
        Ok(())
    }

    /// Approximate in-memory/wire size in bytes
    ///
    /// Field lengths plus a fixed overhead. Used for buffer byte accounting;
    /// intentionally not the exact serialized length, which would put JSON
    /// encoding on the submit hot path.
    pub fn approx_size(&self) -> usize {
        let attrs: usize = self
            .attributes
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum();
        self.source.len()
            + self.message.len()
            + self.raw_exception.as_deref().map_or(0, str::len)
            + attrs
            + EVENT_SIZE_OVERHEAD
    }

    /// Render the JSON wire shape
    ///
    /// Keys: `timestamp` (RFC 3339), `level`, `app`, `message`, `exception`
    /// (nullable), plus attributes flattened as top-level string fields.
    /// Attributes that would shadow a reserved key are skipped.
    pub fn to_wire(&self) -> Value {
        let mut map = Map::with_capacity(RESERVED_KEYS.len() + self.attributes.len());
        map.insert(
            "timestamp".into(),
            Value::String(self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        map.insert("level".into(), Value::String(self.severity.as_str().into()));
        let app = if self.source.is_empty() {
            DEFAULT_APP
        } else {
            &self.source
        };
        map.insert("app".into(), Value::String(app.into()));
        map.insert("message".into(), Value::String(self.message.clone()));
        map.insert(
            "exception".into(),
            self.raw_exception
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        );
        for (key, value) in &self.attributes {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            map.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(map)
    }

    /// Render the JSON wire shape as a single line
    pub fn to_wire_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_wire())
    }
}

/// Builder for `Event`
///
/// Construction is infallible; validation happens at submit time so that
/// callers building events off the hot path pay nothing for it.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    timestamp: DateTime<Utc>,
    severity: Severity,
    source: String,
    message: String,
    attributes: BTreeMap<String, String>,
    raw_exception: Option<String>,
}

impl EventBuilder {
    /// Override the event timestamp
    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the emitting application or function name
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Add a structured field
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attach captured exception text
    #[must_use]
    pub fn exception(mut self, text: impl Into<String>) -> Self {
        self.raw_exception = Some(text.into());
        self
    }

    /// Finish building the event
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            timestamp: self.timestamp,
            severity: self.severity,
            source: self.source,
            message: self.message,
            attributes: self.attributes,
            raw_exception: self.raw_exception,
        }
    }
}
