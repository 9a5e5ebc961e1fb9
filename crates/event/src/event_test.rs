//! Event model tests

use chrono::{DateTime, TimeZone, Utc};

use crate::{Event, Severity, DEFAULT_APP, EVENT_SIZE_OVERHEAD};

fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 30, 45).unwrap()
}

#[test]
fn test_builder_defaults() {
    let event = Event::builder(Severity::Info, "hello").build();

    assert_eq!(event.severity(), Severity::Info);
    assert_eq!(event.message(), "hello");
    assert_eq!(event.source(), "");
    assert!(event.attributes().is_empty());
    assert!(event.raw_exception().is_none());
}

#[test]
fn test_builder_full() {
    let event = Event::builder(Severity::Error, "boom")
        .timestamp(fixed_timestamp())
        .source("order-service")
        .attribute("request_id", "r-42")
        .attribute("trace_id", "t-7")
        .exception("stack trace here")
        .build();

    assert_eq!(event.timestamp(), fixed_timestamp());
    assert_eq!(event.source(), "order-service");
    assert_eq!(event.attributes().len(), 2);
    assert_eq!(event.attributes()["request_id"], "r-42");
    assert_eq!(event.raw_exception(), Some("stack trace here"));
}

#[test]
fn test_validate_ok() {
    let event = Event::builder(Severity::Debug, "fine").build();
    assert!(event.validate().is_ok());
}

#[test]
fn test_validate_empty_message() {
    let event = Event::builder(Severity::Debug, "").build();
    let err = event.validate().unwrap_err();
    assert!(err.to_string().contains("empty message"));
}

#[test]
fn test_validate_pre_epoch_timestamp() {
    let event = Event::builder(Severity::Debug, "old")
        .timestamp(Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 0).unwrap())
        .build();
    let err = event.validate().unwrap_err();
    assert!(err.to_string().contains("epoch"));
}

#[test]
fn test_approx_size_accounts_for_fields() {
    let small = Event::builder(Severity::Info, "m").build();
    let large = Event::builder(Severity::Info, "m")
        .source("some-service")
        .attribute("key", "value")
        .exception("trace")
        .build();

    assert!(small.approx_size() >= 1 + EVENT_SIZE_OVERHEAD);
    assert!(large.approx_size() > small.approx_size());
}

#[test]
fn test_wire_shape_keys() {
    let event = Event::builder(Severity::Critical, "db down")
        .timestamp(fixed_timestamp())
        .source("order-service")
        .attribute("request_id", "r-42")
        .exception("timeout after 30s")
        .build();

    let wire = event.to_wire();
    let obj = wire.as_object().unwrap();

    assert_eq!(obj["timestamp"], "2025-06-15T12:30:45.000Z");
    assert_eq!(obj["level"], "critical");
    assert_eq!(obj["app"], "order-service");
    assert_eq!(obj["message"], "db down");
    assert_eq!(obj["exception"], "timeout after 30s");
    assert_eq!(obj["request_id"], "r-42");
}

#[test]
fn test_wire_empty_source_falls_back() {
    let event = Event::builder(Severity::Info, "anonymous").build();
    let wire = event.to_wire();
    assert_eq!(wire["app"], DEFAULT_APP);
}

#[test]
fn test_wire_null_exception() {
    let event = Event::builder(Severity::Info, "clean").build();
    let wire = event.to_wire();
    assert!(wire["exception"].is_null());
}

#[test]
fn test_wire_attribute_cannot_shadow_reserved() {
    let event = Event::builder(Severity::Info, "real message")
        .attribute("message", "spoofed")
        .attribute("level", "spoofed")
        .attribute("custom", "kept")
        .build();

    let wire = event.to_wire();
    assert_eq!(wire["message"], "real message");
    assert_eq!(wire["level"], "info");
    assert_eq!(wire["custom"], "kept");
}

#[test]
fn test_wire_string_is_single_line() {
    let event = Event::builder(Severity::Info, "line").build();
    let line = event.to_wire_string().unwrap();
    assert!(!line.contains('\n'));
    assert!(line.starts_with('{'));
}

#[test]
fn test_clone_equality() {
    let event = Event::builder(Severity::Warning, "dup")
        .source("svc")
        .attribute("k", "v")
        .build();
    let copy = event.clone();
    assert_eq!(event, copy);
}
