//! Shared background-scan loop used by the notification watchers.
//!
//! Spawns a tokio task that recomputes a derived snapshot on a fixed
//! interval and publishes it through a watch channel. There is no mutation
//! channel from the UI flows that write storage, so polling bounds the
//! staleness instead; callers can force an immediate rescan via
//! [`ScanLoop::recheck`].

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default interval between rescans.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Handle to a running scan loop.
///
/// The loop stops when [`shutdown`](Self::shutdown) is called or the handle
/// is dropped, so a torn-down owner never leaks recurring work.
pub(crate) struct ScanLoop<T> {
    state: watch::Receiver<T>,
    recheck: Arc<Notify>,
    cancel: CancellationToken,
}

impl<T> ScanLoop<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Run `scan` once immediately, then every `interval` and on demand.
    pub(crate) fn spawn<F>(interval: Duration, scan: F) -> Self
    where
        F: Fn() -> T + Send + 'static,
    {
        // tokio::time::interval rejects a zero period; clamp so tests can
        // pass near-zero intervals.
        let period = interval.max(Duration::from_millis(1));

        let (tx, rx) = watch::channel(scan());
        let recheck = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let notify = Arc::clone(&recheck);
        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // First tick completes immediately; the initial snapshot above
            // already covers it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticker.tick() => {}
                    () = notify.notified() => {}
                }

                if tx.send(scan()).is_err() {
                    break;
                }
            }

            debug!("scan loop stopped");
        });

        Self {
            state: rx,
            recheck,
            cancel,
        }
    }

    /// Latest published snapshot.
    pub(crate) fn snapshot(&self) -> T {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.state.clone()
    }

    /// Request an immediate rescan without waiting for the next tick.
    pub(crate) fn recheck(&self) {
        self.recheck.notify_one();
    }

    /// Stop the loop.
    pub(crate) fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for ScanLoop<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
