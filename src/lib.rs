//! Portal core: local record storage and notification derivation for an
//! internal business portal (HR/personnel, document tracking, scheduling,
//! client/supplier registries, document templating).
//!
//! # Architecture
//!
//! Domain records are JSON arrays persisted under fixed or per-entity string
//! keys in an injected [`KeyValueStore`]. On top of that layer sit:
//! - **Scanners** ([`expiry::ExpiryWatcher`], [`agenda::AgendaWatcher`]):
//!   background loops that re-derive notification state (expiring documents,
//!   urgent next-day items) on a fixed interval and on demand. Advisory:
//!   storage faults degrade to "no findings".
//! - **Template service** ([`templates::TemplateService`]): authoritative
//!   upsert/list/remove over the saved-template collection, keyed by
//!   `(id, category)`.
//! - **Client history** ([`history`]): newest-first interaction log per
//!   client.
//! - **Bulk reset** ([`reset::clear_portal_data`]): explicit, idempotent
//!   clearing of the fixed key set.
//!
//! There is no cross-component messaging: each piece independently reads and
//! writes its own keys, last write wins.

pub mod agenda;
pub mod error;
pub mod expiry;
pub mod history;
pub mod records;
pub mod reset;
pub mod storage;
pub mod templates;
mod watcher;

pub use agenda::AgendaWatcher;
pub use error::{PortalError, Result};
pub use expiry::{ExpiryWarning, ExpiryWatcher};
pub use records::{
    ClienteFornecedor, Compromisso, Documento, Funcionario, HistoricoEntry, HistoricoKind,
    Prioridade, TemplateCategory, TemplateRecord,
};
pub use reset::clear_portal_data;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use templates::TemplateService;
pub use watcher::DEFAULT_SCAN_INTERVAL;
