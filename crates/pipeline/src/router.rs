//! Sink router - buffered fan-out from submission to delivery
//!
//! The `SinkRouter` accepts single events, fans them out to every
//! destination whose predicate matches, buffers per destination, and
//! dispatches batches to per-destination delivery workers when a flush
//! trigger fires.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use logfan_config::{BackpressurePolicy, DestinationConfig};
use logfan_event::{Batch, Event, FlushReason};
use logfan_routing::{RoutePredicate, RouteTable, RouteTableBuilder, RoutingError};
use logfan_sinks::{DeliveryFailed, RetryManager, RetryPolicy, Sink};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::{Instant, MissedTickBehavior};

use crate::buffer::Buffer;
use crate::error::{Result, RouterError};
use crate::metrics::{DropTracker, RouterMetrics, RouterMetricsSnapshot};
use crate::worker::{spawn_worker, DestShared, WorkerCommand};

/// State for one configured destination
struct DestState {
    name: String,
    policy: BackpressurePolicy,
    ceiling: usize,

    /// Events awaiting a flush trigger; the lock is never held across
    /// an await point other than its own acquisition
    buffer: Mutex<Buffer>,

    /// Pending-event accounting shared with the delivery worker
    shared: Arc<DestShared>,

    /// Command channel into the delivery worker
    tx: mpsc::UnboundedSender<WorkerCommand>,
}

/// Shared router core
///
/// Held by the `SinkRouter` handle and, weakly, by the age ticker task.
struct Inner {
    table: RouteTable,
    /// Indexed by `DestId`
    dests: Vec<DestState>,
    closed: AtomicBool,
    metrics: Arc<RouterMetrics>,
    drop_tracker: DropTracker,
}

impl Inner {
    /// Build a batch and hand it to the destination's worker
    fn dispatch(&self, dest: &DestState, events: Vec<Event>, reason: FlushReason) {
        let batch = Batch::new(dest.name.clone(), events, reason);
        self.metrics.record_flush(reason);

        tracing::debug!(
            destination = %dest.name,
            events = batch.count(),
            bytes = batch.total_bytes(),
            reason = %reason,
            "dispatching batch"
        );

        let count = batch.count();
        if dest.tx.send(WorkerCommand::Deliver(batch)).is_err() {
            // only reachable while the router is being torn down
            dest.shared.release(count);
            tracing::warn!(
                destination = %dest.name,
                events = count,
                "delivery worker unavailable, batch dropped"
            );
        }
    }

    /// Flush buffers whose oldest event exceeds the age threshold
    async fn flush_aged(&self) {
        let now = Instant::now();
        for dest in &self.dests {
            let drained = {
                let mut buffer = dest.buffer.lock().await;
                if buffer.age_triggered(now) {
                    buffer.drain()
                } else {
                    None
                }
            };
            if let Some(events) = drained {
                self.dispatch(dest, events, FlushReason::Age);
            }
        }
    }

    /// Drain every buffer, then wait until each worker has resolved all
    /// batches queued before the barrier
    async fn flush_and_wait(&self) {
        let mut barriers = Vec::with_capacity(self.dests.len());

        for dest in &self.dests {
            let drained = dest.buffer.lock().await.drain();
            if let Some(events) = drained {
                self.dispatch(dest, events, FlushReason::Manual);
            }
            let (tx, rx) = oneshot::channel();
            if dest.tx.send(WorkerCommand::Barrier(tx)).is_ok() {
                barriers.push(rx);
            }
        }

        for barrier in barriers {
            // a stopped worker has nothing left in flight
            let _ = barrier.await;
        }
    }

    fn pending_events(&self) -> usize {
        self.dests.iter().map(|d| d.shared.pending()).sum()
    }
}

/// Buffered fan-out router
///
/// # Design
///
/// - `submit` validates, routes via the pre-compiled `RouteTable`, and
///   appends to per-destination buffers
/// - Size triggers flush inline on the submitting task; age triggers are
///   evaluated by a background ticker
/// - One worker task per destination delivers batches serially through
///   a `RetryManager`, so retries never reorder a destination's stream
/// - Terminal delivery failures are surfaced on the channel returned by
///   [`take_failures`](SinkRouter::take_failures)
///
/// # Example
///
/// ```ignore
/// let sink = Arc::new(MemorySink::new());
/// let mut router = SinkRouter::builder()
///     .destination("archive", DestinationConfig::default(), sink)
///     .build()?;
///
/// router.submit(Event::builder(Severity::Info, "started").build()).await?;
/// router.flush_all().await?;
/// router.shutdown(Duration::from_secs(5)).await?;
/// ```
pub struct SinkRouter {
    inner: Arc<Inner>,
    failures: Option<mpsc::UnboundedReceiver<DeliveryFailed>>,
}

impl SinkRouter {
    /// Start building a router
    #[must_use]
    pub fn builder() -> SinkRouterBuilder {
        SinkRouterBuilder::new()
    }

    /// Submit one event for routing
    ///
    /// Fans the event out to every destination whose predicate matches
    /// its severity. An event matching no destination is counted and
    /// discarded. Returns once the event is accepted into every matching
    /// buffer; with the `Block` backpressure policy this may wait for
    /// delivery capacity.
    ///
    /// # Errors
    ///
    /// - [`RouterError::Malformed`] if the event fails validation
    /// - [`RouterError::Closed`] after shutdown has begun
    pub async fn submit(&self, event: Event) -> Result<()> {
        let inner = &self.inner;
        if inner.closed.load(Ordering::SeqCst) {
            return Err(RouterError::Closed);
        }

        if let Err(reason) = event.validate() {
            inner.metrics.record_rejected();
            tracing::warn!(
                severity = %event.severity(),
                reason = %reason,
                "rejecting malformed event"
            );
            return Err(reason.into());
        }

        inner.metrics.record_received();

        let targets = inner.table.route(event.severity());
        let Some((&last, rest)) = targets.split_last() else {
            inner.metrics.record_unrouted();
            tracing::trace!(severity = %event.severity(), "event matched no destination");
            return Ok(());
        };

        // one clone per extra destination; the last takes ownership
        for &id in rest {
            self.submit_to(&inner.dests[id.as_usize()], event.clone())
                .await?;
        }
        self.submit_to(&inner.dests[last.as_usize()], event).await
    }

    /// Append one event to one destination, honoring its backpressure
    /// policy, and flush inline if the size trigger fires
    async fn submit_to(&self, dest: &DestState, event: Event) -> Result<()> {
        let inner = &self.inner;

        match dest.policy {
            BackpressurePolicy::Block => {
                let mut waited = false;
                loop {
                    if dest.shared.pending() < dest.ceiling {
                        break;
                    }
                    if inner.closed.load(Ordering::SeqCst) {
                        return Err(RouterError::Closed);
                    }
                    if !waited {
                        waited = true;
                        inner.metrics.record_backpressure_wait();
                        tracing::debug!(
                            destination = %dest.name,
                            ceiling = dest.ceiling,
                            "waiting for delivery capacity"
                        );
                    }
                    // register before re-checking to avoid a lost wakeup
                    let released = dest.shared.capacity_released();
                    if dest.shared.pending() < dest.ceiling {
                        break;
                    }
                    released.await;
                }
            }
            BackpressurePolicy::DropNewest => {
                if dest.shared.pending() >= dest.ceiling {
                    inner.metrics.record_dropped(1);
                    inner.drop_tracker.record_drop(1);
                    return Ok(());
                }
            }
            BackpressurePolicy::DropOldest => {
                if dest.shared.pending() >= dest.ceiling {
                    let evicted = dest.buffer.lock().await.evict_oldest();
                    if evicted.is_some() {
                        dest.shared.release(1);
                        inner.metrics.record_dropped(1);
                        inner.drop_tracker.record_drop(1);
                    }
                    // an empty buffer means the ceiling is held entirely by
                    // in-flight batches; accept the event rather than lose it
                }
            }
        }

        dest.shared.acquire(1);
        let drained = {
            let mut buffer = dest.buffer.lock().await;
            buffer.push(event);
            if buffer.size_triggered() {
                buffer.drain()
            } else {
                None
            }
        };
        if let Some(events) = drained {
            inner.dispatch(dest, events, FlushReason::Size);
        }
        Ok(())
    }

    /// Flush every buffer and wait for the resulting deliveries
    ///
    /// Drains all buffers as `Manual` batches (empty buffers emit
    /// nothing) and returns once each destination's worker has resolved
    /// every batch queued before the call, including retries. Safe to
    /// call concurrently with `submit`; events submitted after the drain
    /// wait for the next trigger.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Closed`] after shutdown has begun.
    pub async fn flush_all(&self) -> Result<()> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(RouterError::Closed);
        }
        self.inner.flush_and_wait().await;
        Ok(())
    }

    /// Shut the router down
    ///
    /// Atomically stops accepting events, then performs a final flush and
    /// waits up to `deadline` for in-flight deliveries to resolve.
    ///
    /// # Errors
    ///
    /// - [`RouterError::Closed`] if shutdown was already initiated
    /// - [`RouterError::FlushTimeout`] if the deadline passes with events
    ///   still undelivered
    pub async fn shutdown(&self, deadline: Duration) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Err(RouterError::Closed);
        }

        // wake blocked submitters so they observe the closed flag
        for dest in &self.inner.dests {
            dest.shared.wake_waiters();
        }

        tracing::info!(deadline = ?deadline, "router shutting down, flushing buffers");

        match tokio::time::timeout(deadline, self.inner.flush_and_wait()).await {
            Ok(()) => {
                let s = self.inner.metrics.snapshot();
                tracing::info!(
                    events_received = s.events_received,
                    events_delivered = s.events_delivered,
                    deliveries_failed = s.deliveries_failed,
                    events_dropped = s.events_dropped,
                    "router shut down"
                );
                Ok(())
            }
            Err(_) => {
                let undelivered = self.inner.pending_events();
                tracing::error!(undelivered, "shutdown flush deadline exceeded");
                Err(RouterError::FlushTimeout { undelivered })
            }
        }
    }

    /// Take the terminal delivery failure receiver
    ///
    /// Each [`DeliveryFailed`] describes one batch that exhausted its
    /// retries or hit a permanent sink error. Returns None after the
    /// first call.
    pub fn take_failures(&mut self) -> Option<mpsc::UnboundedReceiver<DeliveryFailed>> {
        self.failures.take()
    }

    /// Buffered plus in-flight events across all destinations
    pub fn pending_events(&self) -> usize {
        self.inner.pending_events()
    }

    /// Number of configured destinations
    #[inline]
    pub fn dest_count(&self) -> usize {
        self.inner.dests.len()
    }

    /// Point-in-time metrics snapshot
    pub fn metrics(&self) -> RouterMetricsSnapshot {
        self.inner.metrics.snapshot()
    }
}

impl std::fmt::Debug for SinkRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkRouter")
            .field("destinations", &self.inner.table.names())
            .field("closed", &self.inner.closed.load(Ordering::SeqCst))
            .field("pending_events", &self.pending_events())
            .finish()
    }
}

/// Builder for [`SinkRouter`]
///
/// Destinations are registered with their configuration and sink; the
/// route predicate is derived from the configured severity threshold.
pub struct SinkRouterBuilder {
    tick_interval: Duration,
    dests: Vec<(String, DestinationConfig, Arc<dyn Sink>)>,
}

impl SinkRouterBuilder {
    /// Create a builder with the default 200ms age tick
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            dests: Vec::new(),
        }
    }

    /// Set the age-trigger evaluation interval
    ///
    /// Buffers may hold an event up to `max_batch_age` plus one tick
    /// before an age flush fires.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Register a destination with its configuration and sink
    ///
    /// A configured `severity_threshold` routes only events at or above
    /// it; absent, the destination receives every event.
    #[must_use]
    pub fn destination(
        mut self,
        name: impl Into<String>,
        config: DestinationConfig,
        sink: Arc<dyn Sink>,
    ) -> Self {
        self.dests.push((name.into(), config, sink));
        self
    }

    /// Compile the route table, spawn workers and the age ticker
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if two destinations share a name.
    pub fn build(self) -> std::result::Result<SinkRouter, RoutingError> {
        let metrics = Arc::new(RouterMetrics::new());
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();

        let mut table_builder = RouteTableBuilder::new();
        let mut dests = Vec::with_capacity(self.dests.len());

        for (name, config, sink) in self.dests {
            let predicate = match config.severity_threshold {
                Some(threshold) => RoutePredicate::AtLeast(threshold),
                None => RoutePredicate::Always,
            };
            let id = table_builder.register(&name, predicate)?;
            debug_assert_eq!(id.as_usize(), dests.len());

            let retry = RetryManager::new(RetryPolicy::new(
                config.retry_max_attempts,
                config.retry_backoff_base,
                config.retry_backoff_max,
            ));
            let shared = Arc::new(DestShared::new());
            let (tx, rx) = mpsc::unbounded_channel();

            spawn_worker(
                name.clone(),
                sink,
                retry,
                Arc::clone(&shared),
                Arc::clone(&metrics),
                failure_tx.clone(),
                rx,
            );

            dests.push(DestState {
                name,
                policy: config.backpressure_policy,
                ceiling: config.backpressure_ceiling,
                buffer: Mutex::new(Buffer::new(
                    config.max_batch_events,
                    config.max_batch_bytes,
                    config.max_batch_age,
                )),
                shared,
                tx,
            });
        }

        let inner = Arc::new(Inner {
            table: table_builder.build(),
            dests,
            closed: AtomicBool::new(false),
            metrics,
            drop_tracker: DropTracker::new(),
        });

        spawn_ticker(&inner, self.tick_interval);

        tracing::info!(
            destinations = ?inner.table.names(),
            tick_interval = ?self.tick_interval,
            "sink router started"
        );

        Ok(SinkRouter {
            inner,
            failures: Some(failure_rx),
        })
    }
}

impl Default for SinkRouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the age ticker
///
/// Holds the router core weakly so the task stops once every
/// `SinkRouter` handle is dropped.
fn spawn_ticker(inner: &Arc<Inner>, tick: Duration) {
    let weak = Arc::downgrade(inner);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the first tick resolves immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            let Some(inner) = weak.upgrade() else {
                break;
            };
            inner.flush_aged().await;
        }
    });
}
