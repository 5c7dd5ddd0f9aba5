//! Domain record types and their explicit decode functions.
//!
//! Field names mirror the persisted JSON layout of the portal's storage
//! slots (camelCase and Portuguese names), so existing data decodes without
//! migration. Decoding is schema-on-read made explicit: each `decode_*`
//! function validates required fields through serde and falls back to an
//! empty collection on any failure.

use crate::storage::{
    self, KEY_AGENDA, KEY_CLIENTES_FORNECEDORES, KEY_FUNCIONARIOS, KeyValueStore,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Wall-clock date format used across all persisted records.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static ENTRY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A document held in an employee's storage slot. Read-only to the scanners.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documento {
    /// Document identifier.
    pub id: i64,
    /// Whether the document carries an expiry date at all.
    #[serde(default)]
    pub has_expiry: bool,
    /// Expiry date (`YYYY-MM-DD`), when present.
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Whether the owner already viewed the expiry warning.
    #[serde(default)]
    pub viewed: bool,
}

/// Employee reference: resolves a document slot and labels scan results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Funcionario {
    /// Employee identifier.
    pub id: i64,
    /// Display name.
    pub nome: String,
}

/// Priority of a scheduled item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Prioridade {
    /// Routine item.
    Normal,
    /// Important item.
    Importante,
    /// Highest priority; the only level the urgent-task scan considers.
    MuitoImportante,
}

/// A scheduled item (compromisso) from the agenda collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compromisso {
    /// Item identifier.
    pub id: String,
    /// Item title.
    #[serde(default)]
    pub titulo: String,
    /// Priority level.
    pub prioridade: Prioridade,
    /// Scheduled date (`YYYY-MM-DD`).
    pub data: String,
    /// Completion flag.
    #[serde(default)]
    pub concluido: bool,
}

/// Template category; together with the id it forms the compound key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    /// Proposal templates.
    Proposal,
    /// Contract templates.
    Contract,
}

/// A named document template.
///
/// The payload is opaque to the persistence layer and flattened into the
/// stored object; only the compound key and the service-assigned timestamps
/// are interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Template identifier (unique within a category).
    pub id: String,
    /// Template category.
    pub category: TemplateCategory,
    /// Creation timestamp (RFC 3339), preserved across updates.
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    /// Last-save timestamp (RFC 3339), refreshed on every save.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
    /// Content fields, opaque to this layer.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl TemplateRecord {
    /// Create a template with an empty payload and unset timestamps.
    ///
    /// The template service assigns both timestamps on upsert.
    #[must_use]
    pub fn new(id: impl Into<String>, category: TemplateCategory) -> Self {
        Self {
            id: id.into(),
            category,
            created_at: String::new(),
            updated_at: String::new(),
            payload: serde_json::Map::new(),
        }
    }
}

/// Tone of a client history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoricoKind {
    /// Favorable interaction.
    Positive,
    /// Informational entry.
    Neutral,
    /// Unfavorable interaction.
    Negative,
}

fn default_actor() -> String {
    "System".to_owned()
}

/// One entry in a client's interaction history (stored newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricoEntry {
    /// Time-based identifier.
    pub id: String,
    /// Entry date (`YYYY-MM-DD`).
    pub date: String,
    /// Entry tone.
    pub kind: HistoricoKind,
    /// Short title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: String,
    /// Who recorded the entry.
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl HistoricoEntry {
    /// Create an entry dated today, attributed to `"System"`.
    #[must_use]
    pub fn new(kind: HistoricoKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_entry_id(),
            date: today_string(),
            kind,
            title: title.into(),
            description: description.into(),
            actor: default_actor(),
        }
    }

    /// Attribute the entry to a named actor instead of `"System"`.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }
}

/// A client or supplier registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteFornecedor {
    /// Registry identifier.
    pub id: i64,
    /// Display name.
    pub nome: String,
    /// Registry kind tag, opaque to this core.
    #[serde(default)]
    pub tipo: String,
}

/// Decode the employee roster. Best effort: malformed storage yields empty.
pub fn decode_funcionarios(store: &dyn KeyValueStore) -> Vec<Funcionario> {
    storage::load_records(store, KEY_FUNCIONARIOS)
}

/// Decode one employee's document slot. Best effort.
pub fn decode_documentos(store: &dyn KeyValueStore, funcionario_id: i64) -> Vec<Documento> {
    storage::load_records(store, &storage::documentos_funcionario_key(funcionario_id))
}

/// Decode the scheduled-item collection. Best effort.
pub fn decode_compromissos(store: &dyn KeyValueStore) -> Vec<Compromisso> {
    storage::load_records(store, KEY_AGENDA)
}

/// Decode the client/supplier registry. Best effort.
pub fn decode_clientes_fornecedores(store: &dyn KeyValueStore) -> Vec<ClienteFornecedor> {
    storage::load_records(store, KEY_CLIENTES_FORNECEDORES)
}

/// Rewrite the client/supplier registry.
pub fn save_clientes_fornecedores(
    store: &dyn KeyValueStore,
    registros: &[ClienteFornecedor],
) -> crate::Result<()> {
    storage::save_records(store, KEY_CLIENTES_FORNECEDORES, registros)
}

/// Today's date in the persisted `YYYY-MM-DD` format.
#[must_use]
pub fn today_string() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

pub(crate) fn new_entry_id() -> String {
    let counter = ENTRY_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("hist-{}-{counter}", now_epoch_millis())
}

pub(crate) fn now_epoch_millis() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn documento_decodes_camel_case_wire_names() {
        let json = r#"[{"id":3,"hasExpiry":true,"expiryDate":"2026-08-24","viewed":false}]"#;
        let docs: Vec<Documento> = serde_json::from_str(json).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].has_expiry);
        assert_eq!(docs[0].expiry_date.as_deref(), Some("2026-08-24"));
        assert!(!docs[0].viewed);
    }

    #[test]
    fn documento_optional_fields_default() {
        let json = r#"[{"id":7}]"#;
        let docs: Vec<Documento> = serde_json::from_str(json).unwrap();
        assert!(!docs[0].has_expiry);
        assert!(docs[0].expiry_date.is_none());
        assert!(!docs[0].viewed);
    }

    #[test]
    fn prioridade_wire_strings() {
        let items: Vec<Prioridade> =
            serde_json::from_str(r#"["normal","importante","muito-importante"]"#).unwrap();
        assert_eq!(
            items,
            vec![
                Prioridade::Normal,
                Prioridade::Importante,
                Prioridade::MuitoImportante
            ]
        );
        assert_eq!(
            serde_json::to_string(&Prioridade::MuitoImportante).unwrap(),
            r#""muito-importante""#
        );
    }

    #[test]
    fn decode_compromissos_skips_malformed_collection() {
        let store = MemoryStore::new();
        store
            .set(KEY_AGENDA, r#"[{"id":"1","prioridade":"urgente","data":"2026-01-01"}]"#)
            .unwrap();
        // Unknown priority string fails validation for the whole slot.
        assert!(decode_compromissos(&store).is_empty());
    }

    #[test]
    fn template_payload_is_opaque_and_flattened() {
        let json = r#"{"id":"t1","category":"proposal","createdAt":"","updatedAt":"","body":"Dear {client}","pages":3}"#;
        let record: TemplateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, TemplateCategory::Proposal);
        assert_eq!(record.payload.get("pages"), Some(&serde_json::json!(3)));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back.get("body"), Some(&serde_json::json!("Dear {client}")));
    }

    #[test]
    fn historico_entry_defaults() {
        let entry = HistoricoEntry::new(HistoricoKind::Neutral, "Cadastro", "Cliente criado");
        assert_eq!(entry.actor, "System");
        assert!(entry.id.starts_with("hist-"));
        assert_eq!(entry.date, today_string());

        let entry = entry.with_actor("Maria");
        assert_eq!(entry.actor, "Maria");
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = new_entry_id();
        let b = new_entry_id();
        assert_ne!(a, b);
    }

    #[test]
    fn clientes_fornecedores_round_trip() {
        let store = MemoryStore::new();
        let registros = vec![ClienteFornecedor {
            id: 1,
            nome: "Fornecedora Alfa".to_owned(),
            tipo: "fornecedor".to_owned(),
        }];
        save_clientes_fornecedores(&store, &registros).unwrap();
        let restored = decode_clientes_fornecedores(&store);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].nome, "Fornecedora Alfa");
    }
}
