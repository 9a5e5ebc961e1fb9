//! Per-destination delivery worker
//!
//! Each destination gets one worker task owning its sink. Batches for a
//! destination are delivered strictly one at a time, in dispatch order,
//! so a slow or retrying sink never sees interleaved batches.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use logfan_sinks::{DeliveryFailed, RetryManager, Sink};
use tokio::sync::{mpsc, oneshot, Notify};
use tokio::task::JoinHandle;

use crate::metrics::RouterMetrics;

/// Work item for a delivery worker
pub(crate) enum WorkerCommand {
    /// Deliver a batch through the retry manager
    Deliver(logfan_event::Batch),
    /// Acknowledge once every previously queued batch has been resolved
    Barrier(oneshot::Sender<()>),
}

/// Accounting shared between the router front and one worker
///
/// `pending` counts buffered plus in-flight events for the destination;
/// it drives backpressure decisions and the shutdown undelivered count.
#[derive(Debug, Default)]
pub(crate) struct DestShared {
    pending: AtomicUsize,
    capacity: Notify,
}

impl DestShared {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn acquire(&self, count: usize) {
        self.pending.fetch_add(count, Ordering::AcqRel);
    }

    /// Release pending slots and wake any blocked submitters
    pub(crate) fn release(&self, count: usize) {
        self.pending.fetch_sub(count, Ordering::AcqRel);
        self.capacity.notify_waiters();
    }

    /// Future resolved the next time capacity is released
    #[inline]
    pub(crate) fn capacity_released(&self) -> tokio::sync::futures::Notified<'_> {
        self.capacity.notified()
    }

    /// Wake blocked submitters without releasing capacity
    ///
    /// Used at shutdown so waiters observe the closed flag.
    pub(crate) fn wake_waiters(&self) {
        self.capacity.notify_waiters();
    }
}

/// Spawn the delivery worker for one destination
///
/// The task exits when every sender for its command channel is dropped,
/// after resolving all queued commands.
pub(crate) fn spawn_worker(
    destination: String,
    sink: Arc<dyn Sink>,
    retry: RetryManager,
    shared: Arc<DestShared>,
    metrics: Arc<RouterMetrics>,
    failures: mpsc::UnboundedSender<DeliveryFailed>,
    mut rx: mpsc::UnboundedReceiver<WorkerCommand>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(destination = %destination, "delivery worker starting");

        while let Some(command) = rx.recv().await {
            match command {
                WorkerCommand::Deliver(batch) => {
                    let count = batch.count();
                    match retry.deliver(&batch, sink.as_ref()).await {
                        Ok(ack) => {
                            metrics.record_delivery_success(ack.events as u64, ack.bytes as u64);
                        }
                        Err(failed) => {
                            metrics.record_delivery_failure();
                            // the retry manager already logged the failure;
                            // a dropped receiver just means nobody is listening
                            let _ = failures.send(failed);
                        }
                    }
                    shared.release(count);
                }
                WorkerCommand::Barrier(done) => {
                    let _ = done.send(());
                }
            }
        }

        tracing::debug!(destination = %destination, "delivery worker stopping");
    })
}
