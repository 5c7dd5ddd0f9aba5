//! Bulk reset of the portal's fixed storage keys.
//!
//! An explicit administrative operation — never an import-time side effect.
//! Per-entity slots (`documentos_funcionario_<id>`, `historico_cliente_<id>`)
//! and saved templates are not part of the reset set.

use crate::error::Result;
use crate::storage::{
    KEY_AGENDA, KEY_AGENDA_CHECK, KEY_CANDIDATOS, KEY_CARGOS, KEY_CONTRATOS,
    KEY_DENUNCIAS_CHECK, KEY_DOCUMENTOS, KEY_EMPRESAS, KEY_FUNCIONARIOS,
    KEY_FUNCIONARIOS_CHECK, KEY_VAGAS, KeyValueStore,
};
use tracing::info;

/// The fixed keys cleared by [`clear_portal_data`].
pub const RESET_KEYS: [&str; 11] = [
    KEY_AGENDA,
    KEY_AGENDA_CHECK,
    KEY_FUNCIONARIOS,
    KEY_FUNCIONARIOS_CHECK,
    KEY_DENUNCIAS_CHECK,
    KEY_DOCUMENTOS,
    KEY_CONTRATOS,
    KEY_VAGAS,
    KEY_CANDIDATOS,
    KEY_EMPRESAS,
    KEY_CARGOS,
];

/// Delete every key in [`RESET_KEYS`]. Idempotent: re-running after the
/// first invocation is a no-op.
pub fn clear_portal_data(store: &dyn KeyValueStore) -> Result<()> {
    for key in RESET_KEYS {
        store.remove(key)?;
    }
    info!("cleared {} portal storage keys", RESET_KEYS.len());
    Ok(())
}
