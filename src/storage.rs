//! Key-value storage abstraction and the portal's persisted key layout.
//!
//! Every portal module persists JSON-serialized record arrays under string
//! keys. The store itself is an injected dependency so tests can substitute
//! an in-memory fake; [`FileStore`] is the durable implementation, keeping
//! the whole key space in a single JSON file under the platform data
//! directory.
//!
//! # Key Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `agenda_compromissos` | JSON array of scheduled items |
//! | `funcionarios` | JSON array of employee references |
//! | `documentos_funcionario_<id>` | JSON array of document records |
//! | `saved_templates` | JSON array of template records |
//! | `clientesFornecedores` | JSON array of client/supplier records |
//! | `historico_cliente_<id>` | JSON array of history entries, newest first |
//!
//! # Environment Overrides
//!
//! - `PORTAL_DATA_DIR` — overrides the [`FileStore`] default directory.

use crate::error::{PortalError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Scheduled items (compromissos), one JSON array under a single key.
pub const KEY_AGENDA: &str = "agenda_compromissos";
/// Agenda notification check marker.
pub const KEY_AGENDA_CHECK: &str = "agenda_check";
/// Employee roster.
pub const KEY_FUNCIONARIOS: &str = "funcionarios";
/// Employee notification check marker.
pub const KEY_FUNCIONARIOS_CHECK: &str = "funcionarios_check";
/// Complaint notification check marker.
pub const KEY_DENUNCIAS_CHECK: &str = "denuncias_check";
/// Company-level document registry.
pub const KEY_DOCUMENTOS: &str = "documentos";
/// Contract registry.
pub const KEY_CONTRATOS: &str = "contratos";
/// Job opening registry.
pub const KEY_VAGAS: &str = "vagas";
/// Candidate registry.
pub const KEY_CANDIDATOS: &str = "candidatos";
/// Company registry.
pub const KEY_EMPRESAS: &str = "empresas";
/// Job role registry.
pub const KEY_CARGOS: &str = "cargos";
/// Saved document templates, all categories in one collection.
pub const KEY_TEMPLATES: &str = "saved_templates";
/// Client/supplier registry.
pub const KEY_CLIENTES_FORNECEDORES: &str = "clientesFornecedores";

/// Per-employee document slot key.
#[must_use]
pub fn documentos_funcionario_key(funcionario_id: i64) -> String {
    format!("documentos_funcionario_{funcionario_id}")
}

/// Per-client history slot key.
#[must_use]
pub fn historico_cliente_key(cliente_id: i64) -> String {
    format!("historico_cliente_{cliente_id}")
}

/// String key-value storage, the portal's only persistence surface.
///
/// All operations are synchronous and complete within the calling turn.
/// Removing an absent key is not an error (the bulk reset relies on this
/// for idempotence).
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Deletes `key`. Succeeds when the key does not exist.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Durable store backed by a single JSON file (`key -> raw value`).
///
/// The file is loaded once at construction and rewritten on every mutation.
/// A missing or unreadable file is treated as an empty key space; write
/// failures surface as [`PortalError::Storage`].
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, String>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!("ignoring malformed store file {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(PortalError::Storage(format!(
                    "cannot read store file {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(
            "opened file store at {} ({} keys)",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store at the default platform location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Default store file path.
    ///
    /// Resolves to `dirs::data_dir()/portal/storage.json`. Override the
    /// directory with the `PORTAL_DATA_DIR` environment variable.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let dir = if let Some(override_dir) = std::env::var_os("PORTAL_DATA_DIR") {
            PathBuf::from(override_dir)
        } else {
            dirs::data_dir()
                .map(|d| d.join("portal"))
                .unwrap_or_else(|| PathBuf::from("/tmp/portal-data"))
        };
        dir.join("storage.json")
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PortalError::Storage(format!("cannot create store dir: {e}"))
            })?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| PortalError::Serialize(format!("cannot serialize store: {e}")))?;

        std::fs::write(&self.path, json).map_err(|e| {
            PortalError::Storage(format!("cannot write store file {}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

/// Read a JSON record array from `key`, best effort.
///
/// A missing key, malformed JSON, or records that fail field validation all
/// yield an empty collection — "no prior data" is a valid state and the
/// scanners built on top of this are advisory, not authoritative.
pub fn load_records<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };

    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!("ignoring malformed records under '{key}': {e}");
            Vec::new()
        }
    }
}

/// Serialize `records` and rewrite `key` in full.
///
/// Unlike the read path, failures here are surfaced: silent loss of an
/// authoritative collection is a data-integrity regression, not a missed
/// notification.
pub fn save_records<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    records: &[T],
) -> Result<()> {
    let json = serde_json::to_string(records)
        .map_err(|e| PortalError::Serialize(format!("cannot serialize '{key}': {e}")))?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        nome: String,
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn removing_absent_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("nothing_here").is_ok());
    }

    #[test]
    fn load_records_missing_key_is_empty() {
        let store = MemoryStore::new();
        let rows: Vec<Row> = load_records(&store, "absent");
        assert!(rows.is_empty());
    }

    #[test]
    fn load_records_malformed_json_is_empty() {
        let store = MemoryStore::new();
        store.set("rows", "{not json").unwrap();
        let rows: Vec<Row> = load_records(&store, "rows");
        assert!(rows.is_empty());

        // Wrong shape (object instead of array) degrades the same way.
        store.set("rows", r#"{"id": 1}"#).unwrap();
        let rows: Vec<Row> = load_records(&store, "rows");
        assert!(rows.is_empty());
    }

    #[test]
    fn save_then_load_records() {
        let store = MemoryStore::new();
        let rows = vec![
            Row { id: 1, nome: "a".to_owned() },
            Row { id: 2, nome: "b".to_owned() },
        ];
        save_records(&store, "rows", &rows).unwrap();
        let restored: Vec<Row> = load_records(&store, "rows");
        assert_eq!(restored, rows);
    }

    #[test]
    fn slot_key_formats() {
        assert_eq!(documentos_funcionario_key(5), "documentos_funcionario_5");
        assert_eq!(historico_cliente_key(12), "historico_cliente_12");
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");

        {
            let store = FileStore::open(path.clone()).unwrap();
            store.set("a", "1").unwrap();
            store.set("b", "2").unwrap();
            store.remove("a").unwrap();
        }

        let reopened = FileStore::open(path).unwrap();
        assert!(reopened.get("a").is_none());
        assert_eq!(reopened.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn file_store_tolerates_missing_and_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");

        let missing = FileStore::open(dir.path().join("missing.json")).unwrap();
        assert!(missing.get("k").is_none());

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "]]not json[[").unwrap();
        let store = FileStore::open(garbled).unwrap();
        assert!(store.get("k").is_none());
    }

    #[test]
    fn file_store_remove_absent_key_does_not_rewrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        let store = FileStore::open(path.clone()).unwrap();
        store.remove("ghost").unwrap();
        // No mutation happened, so the backing file was never created.
        assert!(!path.exists());
    }
}
