//! Batch snapshot tests

use crate::{Batch, Event, FlushReason, Severity};

fn events(n: usize) -> Vec<Event> {
    (0..n)
        .map(|i| {
            Event::builder(Severity::Info, format!("message {}", i))
                .source("svc")
                .build()
        })
        .collect()
}

#[test]
fn test_batch_accessors() {
    let batch = Batch::new("archive", events(3), FlushReason::Size);

    assert_eq!(batch.destination(), "archive");
    assert_eq!(batch.count(), 3);
    assert!(!batch.is_empty());
    assert_eq!(batch.reason(), FlushReason::Size);
}

#[test]
fn test_batch_preserves_arrival_order() {
    let batch = Batch::new("archive", events(5), FlushReason::Manual);
    for (i, event) in batch.events().iter().enumerate() {
        assert_eq!(event.message(), format!("message {}", i));
    }
}

#[test]
fn test_batch_total_bytes_is_sum() {
    let evs = events(4);
    let expected: usize = evs.iter().map(Event::approx_size).sum();
    let batch = Batch::new("archive", evs, FlushReason::Age);
    assert_eq!(batch.total_bytes(), expected);
}

#[test]
fn test_empty_batch() {
    let batch = Batch::new("alert", vec![], FlushReason::Manual);
    assert!(batch.is_empty());
    assert_eq!(batch.count(), 0);
    assert_eq!(batch.total_bytes(), 0);
}

#[test]
fn test_into_events() {
    let batch = Batch::new("alert", events(2), FlushReason::Size);
    let evs = batch.into_events();
    assert_eq!(evs.len(), 2);
}

#[test]
fn test_flush_reason_names() {
    assert_eq!(FlushReason::Size.as_str(), "size");
    assert_eq!(FlushReason::Age.as_str(), "age");
    assert_eq!(FlushReason::Manual.as_str(), "manual");
    assert_eq!(FlushReason::Age.to_string(), "age");
}
