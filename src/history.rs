//! Per-client interaction history.
//!
//! Entries live newest-first under `historico_cliente_<clienteId>`. The
//! append returns a success flag rather than an error so UI callers decide
//! how to surface storage failures.

use crate::records::HistoricoEntry;
use crate::storage::{self, KeyValueStore, historico_cliente_key};
use tracing::error;

/// Prepend `entry` to the client's history.
///
/// Returns `false` (and logs) when the write fails; prior entries are left
/// as they were.
pub fn append_history(store: &dyn KeyValueStore, cliente_id: i64, entry: HistoricoEntry) -> bool {
    let key = historico_cliente_key(cliente_id);
    let mut entries: Vec<HistoricoEntry> = storage::load_records(store, &key);
    entries.insert(0, entry);

    match storage::save_records(store, &key, &entries) {
        Ok(()) => true,
        Err(e) => {
            error!("cannot append history for cliente {cliente_id}: {e}");
            false
        }
    }
}

/// The client's history, newest first. Best effort: malformed or missing
/// storage yields an empty collection.
pub fn load_history(store: &dyn KeyValueStore, cliente_id: i64) -> Vec<HistoricoEntry> {
    storage::load_records(store, &historico_cliente_key(cliente_id))
}
