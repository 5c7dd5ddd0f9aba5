//! Expiring-document scanner.
//!
//! Derives, per employee, how many of their documents expire within the
//! warning window. The scan is advisory: storage faults degrade to "no
//! findings", never to an error.

use crate::records::{self, DATE_FORMAT};
use crate::storage::KeyValueStore;
use crate::watcher::{DEFAULT_SCAN_INTERVAL, ScanLoop};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Days ahead (inclusive) a document counts as expiring.
pub const EXPIRY_WINDOW_DAYS: u64 = 2;

/// One employee with at least one document inside the warning window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryWarning {
    /// Employee identifier.
    pub id: i64,
    /// Employee display name.
    pub nome: String,
    /// Number of documents inside the warning window.
    #[serde(rename = "documentosVencendo")]
    pub documentos_vencendo: usize,
}

/// Scan every known employee's document slot for expiring documents.
///
/// A document counts when it has an expiry, its date parses, the owner has
/// not viewed the warning, and the date falls in `[today, today + 2 days]`
/// inclusive. Documents already overdue (dated before `today`) do not
/// count; that matches the portal's observed behavior. Employees with zero
/// matches are omitted entirely.
pub fn scan_expiring(store: &dyn KeyValueStore, today: NaiveDate) -> Vec<ExpiryWarning> {
    let ceiling = today
        .checked_add_days(Days::new(EXPIRY_WINDOW_DAYS))
        .unwrap_or(today);

    records::decode_funcionarios(store)
        .into_iter()
        .filter_map(|funcionario| {
            let documentos_vencendo = records::decode_documentos(store, funcionario.id)
                .iter()
                .filter(|doc| doc.has_expiry && !doc.viewed)
                .filter_map(|doc| doc.expiry_date.as_deref())
                .filter_map(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
                .filter(|date| *date >= today && *date <= ceiling)
                .count();

            (documentos_vencendo > 0).then_some(ExpiryWarning {
                id: funcionario.id,
                nome: funcionario.nome,
                documentos_vencendo,
            })
        })
        .collect()
}

/// Background watcher republishing [`scan_expiring`] results.
///
/// Rescans on construction, every `interval` thereafter (60 seconds by
/// default), and whenever [`recheck`](Self::recheck) is called. The loop
/// stops on [`shutdown`](Self::shutdown) or drop.
pub struct ExpiryWatcher {
    scan_loop: ScanLoop<Vec<ExpiryWarning>>,
}

impl ExpiryWatcher {
    /// Spawn a watcher with the default 60-second interval.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        Self::spawn_with_interval(store, DEFAULT_SCAN_INTERVAL)
    }

    /// Spawn a watcher with a custom rescan interval.
    #[must_use]
    pub fn spawn_with_interval(store: Arc<dyn KeyValueStore>, interval: Duration) -> Self {
        let scan_loop = ScanLoop::spawn(interval, move || {
            scan_expiring(&*store, chrono::Local::now().date_naive())
        });
        Self { scan_loop }
    }

    /// Latest per-employee warning list.
    #[must_use]
    pub fn warnings(&self) -> Vec<ExpiryWarning> {
        self.scan_loop.snapshot()
    }

    /// Whether any employee currently has expiring documents.
    #[must_use]
    pub fn has_avisos(&self) -> bool {
        !self.scan_loop.snapshot().is_empty()
    }

    /// Subscribe to warning-list changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ExpiryWarning>> {
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
