//! In-flight work tracking for quiescence detection
//!
//! Every unit of queued or running work holds a [`WorkGuard`]. The counter
//! only reaches zero when nothing is queued, filtering, dispatching or
//! fetching, and a finishing worker always registers the work it spawns
//! before dropping its own guard. Zero is therefore a stable state: once it
//! is observed the crawl is over.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct TrackerInner {
    pending: AtomicUsize,
    idle: Notify,
}

/// Counts outstanding work and wakes waiters when it drops to zero
#[derive(Debug, Clone, Default)]
pub struct WorkTracker {
    inner: Arc<TrackerInner>,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work; it ends when the guard is dropped
    pub fn start(&self) -> WorkGuard {
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            inner: self.inner.clone(),
        }
    }

    /// Number of units of work currently outstanding
    pub fn in_flight(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }

    /// Waits until no work is outstanding
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent drop cannot be missed
            notified.as_mut().enable();

            if self.is_idle() {
                return;
            }

            notified.await;
        }
    }
}

/// Marks one unit of outstanding work
#[derive(Debug)]
pub struct WorkGuard {
    inner: Arc<TrackerInner>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
