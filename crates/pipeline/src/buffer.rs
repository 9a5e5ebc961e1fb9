//! Per-destination event buffer
//!
//! Accumulates events until a flush trigger fires. The buffer itself is
//! not synchronized; the router wraps it in an async mutex and never holds
//! that lock across an await point.

use std::time::Duration;

use logfan_event::Event;
use tokio::time::Instant;

/// Accumulates events for one destination between flushes
///
/// Age is tracked from the first event pushed into an empty buffer. After
/// a partial eviction the original arrival instant is kept, which can only
/// make an age flush fire earlier, never later.
#[derive(Debug)]
pub(crate) struct Buffer {
    max_events: usize,
    max_bytes: usize,
    max_age: Duration,

    events: Vec<Event>,
    bytes: usize,
    oldest: Option<Instant>,
}

impl Buffer {
    pub(crate) fn new(max_events: usize, max_bytes: usize, max_age: Duration) -> Self {
        Self {
            max_events,
            max_bytes,
            max_age,
            events: Vec::new(),
            bytes: 0,
            oldest: None,
        }
    }

    /// Append an event, recording its arrival if the buffer was empty
    pub(crate) fn push(&mut self, event: Event) {
        if self.events.is_empty() {
            self.oldest = Some(Instant::now());
        }
        self.bytes += event.approx_size();
        self.events.push(event);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether the event-count or byte threshold has been reached
    #[inline]
    pub(crate) fn size_triggered(&self) -> bool {
        self.events.len() >= self.max_events || self.bytes >= self.max_bytes
    }

    /// Whether the oldest buffered event has exceeded the age threshold
    pub(crate) fn age_triggered(&self, now: Instant) -> bool {
        match self.oldest {
            Some(oldest) => now.duration_since(oldest) >= self.max_age,
            None => false,
        }
    }

    /// Remove and return the oldest buffered event
    pub(crate) fn evict_oldest(&mut self) -> Option<Event> {
        if self.events.is_empty() {
            return None;
        }
        let event = self.events.remove(0);
        self.bytes -= event.approx_size();
        if self.events.is_empty() {
            self.oldest = None;
        }
        Some(event)
    }

    /// Take all buffered events, leaving the buffer empty
    ///
    /// Returns None for an empty buffer so callers never emit a
    /// zero-event batch.
    pub(crate) fn drain(&mut self) -> Option<Vec<Event>> {
        if self.events.is_empty() {
            return None;
        }
        self.bytes = 0;
        self.oldest = None;
        Some(std::mem::take(&mut self.events))
    }
}
