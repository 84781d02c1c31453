// src/prefetch/in_flight.rs
// =============================================================================
// Counts background tasks that are still running.
//
// Nothing in the warmer waits for a prefetch to finish. A process that is
// about to exit (the CLI) or a test that wants to look at the cache does
// need to know when the background work has gone quiet, so every spawned
// task holds a guard from this tracker while it runs.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    count: AtomicUsize,
    idle: Notify,
}

/// Shared counter of running background tasks
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    inner: Arc<Inner>,
}

/// Held by one running task; dropping it marks the task as done
#[derive(Debug)]
pub struct InFlightGuard {
    inner: Arc<Inner>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task. Call before spawning so a waiter cannot slip in
    /// between the spawn and the task's first poll.
    pub fn enter(&self) -> InFlightGuard {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Resolves once no task is registered
    pub async fn wait_idle(&self) {
        loop {
            // Created before the check: notify_waiters() reaches it even
            // though it has not been polled yet.
            let notified = self.inner.idle.notified();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
