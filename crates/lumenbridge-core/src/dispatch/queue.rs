use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::debug;

use super::target::ColorUpdate;

/// Pending updates shared by all targets.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Result of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Queued,
    /// The queue was full (or closed); the update was discarded.
    Dropped,
}

/// Producer half of the update queue. `try_enqueue` never blocks.
#[derive(Debug, Clone)]
pub struct UpdateSender {
    inner: Sender<ColorUpdate>,
}

/// Consumer half of the update queue; clone it once per worker.
#[derive(Debug, Clone)]
pub struct UpdateReceiver {
    inner: Receiver<ColorUpdate>,
}

/// Creates a bounded multi-producer, multi-consumer update queue.
///
/// A capacity of zero is raised to one so that enqueueing without a waiting
/// worker can still succeed.
///
/// # Examples
/// ```
/// use lumenbridge_core::dispatch::{Enqueue, update_queue};
///
/// let (tx, rx) = update_queue(8);
/// assert_eq!(tx.capacity(), 8);
/// assert!(rx.try_dequeue().is_none());
/// # let _ = Enqueue::Queued;
/// ```
pub fn update_queue(capacity: usize) -> (UpdateSender, UpdateReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    (UpdateSender { inner: tx }, UpdateReceiver { inner: rx })
}

impl UpdateSender {
    pub fn try_enqueue(&self, update: ColorUpdate) -> Enqueue {
        match self.inner.try_send(update) {
            Ok(()) => Enqueue::Queued,
            Err(TrySendError::Full(update)) => {
                debug!(
                    target_name = update.target_name(),
                    sequence = update.sequence,
                    "output busy, color not sent"
                );
                Enqueue::Dropped
            }
            Err(TrySendError::Disconnected(update)) => {
                debug!(
                    target_name = update.target_name(),
                    "no output workers, color not sent"
                );
                Enqueue::Dropped
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity().unwrap_or(0)
    }
}

impl UpdateReceiver {
    /// Waits for the next update. Returns `None` once every sender is gone
    /// and the queue is drained.
    pub fn dequeue(&self) -> Option<ColorUpdate> {
        self.inner.recv().ok()
    }

    pub fn try_dequeue(&self) -> Option<ColorUpdate> {
        self.inner.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
