//! Background writer that mirrors snapshots into a key-value store.
//!
//! Snapshots are written one at a time, in submission order. While a write
//! is in flight, newer snapshots for the same key replace older queued ones,
//! so the store always ends with the latest snapshot and never with a stale
//! one written over it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use decisionbox_core::storage::{KeyValueStore, SnapshotSink};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Queue {
    pending: Vec<(&'static str, String)>,
    submitted: u64,
    closed: bool,
}

#[derive(Debug)]
struct Shared {
    queue: Mutex<Queue>,
    wake: Notify,
    completed: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Serializing, coalescing writer in front of a `KeyValueStore`.
///
/// Failed writes are logged and dropped; the in-memory state stays
/// authoritative and the next snapshot for the key carries it again.
#[derive(Debug)]
pub struct WriteQueue {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WriteQueue {
    /// Starts the writer task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (completed, _) = watch::channel(0);
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue::default()),
            wake: Notify::new(),
            completed,
        });
        let worker = tokio::spawn(run(Arc::clone(&shared), store));
        Self {
            shared,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Waits until every snapshot submitted before this call has been
    /// written (or has failed).
    pub async fn flush(&self) {
        let target = self.shared.lock().submitted;
        let mut completed = self.shared.completed.subscribe();
        if completed.wait_for(|done| *done >= target).await.is_err() {
            warn!("write queue stopped before flush completed");
        }
    }

    /// Writes out everything queued, then stops the writer. Snapshots
    /// submitted afterwards are dropped.
    pub async fn shutdown(&self) {
        self.shared.lock().closed = true;
        self.shared.wake.notify_one();

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "write queue worker ended abnormally");
            }
        }
    }
}

impl SnapshotSink for WriteQueue {
    fn submit(&self, key: &'static str, payload: String) {
        {
            let mut queue = self.shared.lock();
            if queue.closed {
                warn!(key, "write queue closed, snapshot dropped");
                return;
            }
            match queue.pending.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => {
                    debug!(key, "queued snapshot superseded");
                    slot.1 = payload;
                }
                None => queue.pending.push((key, payload)),
            }
            queue.submitted += 1;
        }
        self.shared.wake.notify_one();
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        self.shared.lock().closed = true;
        self.shared.wake.notify_one();
    }
}

async fn run(shared: Arc<Shared>, store: Arc<dyn KeyValueStore>) {
    loop {
        let (batch, upto, closed) = {
            let mut queue = shared.lock();
            (std::mem::take(&mut queue.pending), queue.submitted, queue.closed)
        };

        if batch.is_empty() {
            shared.completed.send_replace(upto);
            if closed {
                break;
            }
            shared.wake.notified().await;
            continue;
        }

        for (key, payload) in batch {
            match store.set(key, payload).await {
                Ok(()) => debug!(key, "snapshot written"),
                Err(e) => warn!(key, error = %e, "snapshot write failed"),
            }
        }
        shared.completed.send_replace(upto);
    }
    debug!("write queue stopped");
}
