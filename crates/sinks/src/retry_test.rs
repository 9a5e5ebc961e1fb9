//! Retry manager tests
//!
//! Uses a scriptable sink whose responses are queued up front, so the
//! exact number of `put` calls can be asserted. Timers are paused; backoff
//! sleeps auto-advance.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use logfan_event::{Batch, Event, FlushReason, Severity};

use crate::{RetryManager, RetryPolicy, Sink, SinkAck, SinkError};

/// Sink that plays back a scripted sequence of responses
struct ScriptedSink {
    responses: Mutex<VecDeque<Result<(), SinkError>>>,
    calls: AtomicUsize,
}

impl ScriptedSink {
    fn new(responses: Vec<Result<(), SinkError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sink for ScriptedSink {
    async fn put(&self, batch: &Batch) -> Result<SinkAck, SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(Ok(()));
        next.map(|()| SinkAck {
            events: batch.count(),
            bytes: batch.total_bytes(),
        })
    }
}

fn test_batch(n: usize) -> Batch {
    let events = (0..n)
        .map(|i| {
            Event::builder(Severity::Error, format!("failure {}", i))
                .source("order-service")
                .build()
        })
        .collect();
    Batch::new("archive", events, FlushReason::Size)
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(
        max_attempts,
        Duration::from_millis(10),
        Duration::from_millis(100),
    )
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_success() {
    let sink = ScriptedSink::new(vec![Ok(())]);
    let manager = RetryManager::new(fast_policy(3));

    let ack = manager.deliver(&test_batch(5), &sink).await.unwrap();
    assert_eq!(ack.events, 5);
    assert_eq!(sink.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_twice_then_success() {
    // 2 transient failures then success with max_attempts=3:
    // exactly 3 put calls, terminal Ack, no DeliveryFailed.
    let sink = ScriptedSink::new(vec![
        Err(SinkError::timeout("30s")),
        Err(SinkError::throttled("rate exceeded")),
        Ok(()),
    ]);
    let manager = RetryManager::new(fast_policy(3));

    let ack = manager.deliver(&test_batch(2), &sink).await.unwrap();
    assert_eq!(ack.events, 2);
    assert_eq!(sink.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_fails_immediately() {
    // A permanent error on the first call means exactly 1 put call.
    let sink = ScriptedSink::new(vec![Err(SinkError::rejected("payload too large"))]);
    let manager = RetryManager::new(fast_policy(3));

    let err = manager.deliver(&test_batch(4), &sink).await.unwrap_err();
    assert_eq!(sink.calls(), 1);
    assert_eq!(err.attempts, 1);
    assert_eq!(err.events, 4);
    assert_eq!(err.destination, "archive");
    assert!(!err.last_error.is_transient());
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_reports_delivery_failed() {
    let sink = ScriptedSink::new(vec![
        Err(SinkError::connection("refused")),
        Err(SinkError::connection("refused")),
        Err(SinkError::connection("refused")),
    ]);
    let manager = RetryManager::new(fast_policy(3));

    let err = manager.deliver(&test_batch(1), &sink).await.unwrap_err();
    assert_eq!(sink.calls(), 3);
    assert_eq!(err.attempts, 3);
    assert!(err.last_error.is_transient());
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_policy_never_retries() {
    let sink = ScriptedSink::new(vec![Err(SinkError::timeout("slow"))]);
    let manager = RetryManager::new(fast_policy(1));

    let err = manager.deliver(&test_batch(1), &sink).await.unwrap_err();
    assert_eq!(sink.calls(), 1);
    assert_eq!(err.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_identical_batch_each_attempt() {
    // The sink must see the same snapshot on every attempt.
    struct CapturingSink {
        seen: Mutex<Vec<Vec<String>>>,
        fail_first: AtomicUsize,
    }

    #[async_trait]
    impl Sink for CapturingSink {
        async fn put(&self, batch: &Batch) -> Result<SinkAck, SinkError> {
            self.seen.lock().expect("seen lock").push(
                batch
                    .events()
                    .iter()
                    .map(|e| e.message().to_string())
                    .collect(),
            );
            if self.fail_first.load(Ordering::SeqCst) > 0 {
                self.fail_first.fetch_sub(1, Ordering::SeqCst);
                return Err(SinkError::timeout("try again"));
            }
            Ok(SinkAck {
                events: batch.count(),
                bytes: batch.total_bytes(),
            })
        }
    }

    let sink = CapturingSink {
        seen: Mutex::new(Vec::new()),
        fail_first: AtomicUsize::new(1),
    };
    let manager = RetryManager::new(fast_policy(3));

    manager.deliver(&test_batch(3), &sink).await.unwrap();

    let seen = sink.seen.lock().expect("seen lock");
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}
