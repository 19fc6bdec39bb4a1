//! Queue Waiters Module
//!
//! Per-queue wake-up registry backing the blocking pop. Waiters never hold the
//! store lock while parked; QPUSH wakes every waiter of its key and they race
//! for the element under the exclusive lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

// == Queue Waiters ==
/// Registry of one [`Notify`] per queue key that currently has waiters.
#[derive(Debug, Default)]
pub struct QueueWaiters {
    queues: Mutex<HashMap<String, Arc<Notify>>>,
}

impl QueueWaiters {
    pub fn new() -> Self {
        Self::default()
    }

    // == Subscribe ==
    /// Registers interest in `key`.
    ///
    /// The returned guard unregisters on drop, so a cancelled waiter does not
    /// leak its registry entry.
    pub fn subscribe(&self, key: &str) -> QueueWaiter<'_> {
        let notify = {
            let mut queues = self.queues.lock();
            queues.entry(key.to_string()).or_default().clone()
        };

        QueueWaiter {
            registry: self,
            key: key.to_string(),
            notify,
        }
    }

    // == Notify ==
    /// Wakes every waiter currently subscribed to `key`.
    pub fn notify(&self, key: &str) {
        // Notified under the lock so no stray handle skews release()
        if let Some(notify) = self.queues.lock().get(key) {
            notify.notify_waiters();
        }
    }

    /// Number of keys with at least one subscribed waiter.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.queues.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.queues.lock().is_empty()
    }

    /// Drops the registry entry for `key` if `leaving` is its last waiter.
    fn release(&self, key: &str, leaving: &Arc<Notify>) {
        let mut queues = self.queues.lock();

        // Handles are only cloned under this lock: the registry's plus ours
        if Arc::strong_count(leaving) == 2 {
            queues.remove(key);
        }
    }
}

// == Queue Waiter ==
/// A subscription to wake-ups for one queue key.
#[derive(Debug)]
pub struct QueueWaiter<'a> {
    registry: &'a QueueWaiters,
    key: String,
    notify: Arc<Notify>,
}

impl QueueWaiter<'_> {
    /// Future resolving on the next push to this key.
    ///
    /// Call `enable` on the pinned future before checking the queue so a push
    /// landing between the check and the await is not missed.
    pub fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }
}

impl Drop for QueueWaiter<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.key, &self.notify);
    }
}
