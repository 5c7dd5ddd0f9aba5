//! Urgent scheduled-item scanner.
//!
//! Flags whether any highest-priority compromisso lands on the following
//! calendar day and is still open. Like the expiry scan this is advisory:
//! storage faults degrade to "nothing urgent".

use crate::records::{self, DATE_FORMAT, Prioridade};
use crate::storage::KeyValueStore;
use crate::watcher::{DEFAULT_SCAN_INTERVAL, ScanLoop};
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Whether any urgent item is scheduled for tomorrow.
///
/// True iff some item has priority `muito-importante`, a date exactly equal
/// to tomorrow's `YYYY-MM-DD` string, and is not completed. The comparison
/// is string equality, never a range: an item dated the day after tomorrow
/// does not count, regardless of priority.
pub fn scan_urgent(store: &dyn KeyValueStore, today: NaiveDate) -> bool {
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .unwrap_or(today)
        .format(DATE_FORMAT)
        .to_string();

    records::decode_compromissos(store).iter().any(|item| {
        item.prioridade == Prioridade::MuitoImportante && item.data == tomorrow && !item.concluido
    })
}

/// Background watcher republishing [`scan_urgent`] results.
///
/// Same lifecycle as [`crate::expiry::ExpiryWatcher`]: scans on
/// construction, every `interval` (60 seconds by default), and on demand.
pub struct AgendaWatcher {
    scan_loop: ScanLoop<bool>,
}

impl AgendaWatcher {
    /// Spawn a watcher with the default 60-second interval.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        Self::spawn_with_interval(store, DEFAULT_SCAN_INTERVAL)
    }

    /// Spawn a watcher with a custom rescan interval.
    #[must_use]
    pub fn spawn_with_interval(store: Arc<dyn KeyValueStore>, interval: Duration) -> Self {
        let scan_loop = ScanLoop::spawn(interval, move || {
            scan_urgent(&*store, chrono::Local::now().date_naive())
        });
        Self { scan_loop }
    }

    /// Latest urgent-task flag.
    #[must_use]
    pub fn has_urgent(&self) -> bool {
        self.scan_loop.snapshot()
    }

    /// Subscribe to flag changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.scan_loop.subscribe()
    }

    /// Rescan now instead of waiting for the next tick.
    pub fn recheck(&self) {
        self.scan_loop.recheck();
    }

    /// Stop the background loop.
    pub fn shutdown(&self) {
        self.scan_loop.shutdown();
    }
}
