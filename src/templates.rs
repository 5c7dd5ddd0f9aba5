//! Template persistence service.
//!
//! CRUD-style operations over the single `saved_templates` collection.
//! Records are addressed by the `(id, category)` compound key; at most one
//! record exists per key. Unlike the scanners, this collection is
//! authoritative: write failures surface to the caller.

use crate::error::Result;
use crate::records::{TemplateCategory, TemplateRecord};
use crate::storage::{self, KEY_TEMPLATES, KeyValueStore};
use std::sync::Arc;
use tracing::debug;

/// Service over the saved-template collection.
pub struct TemplateService {
    store: Arc<dyn KeyValueStore>,
}

impl TemplateService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Insert or replace the record with `record.id` under `category`.
    ///
    /// An existing record keeps its original `createdAt`; `updatedAt` is
    /// refreshed either way. The whole collection is rewritten on every
    /// call.
    pub fn upsert(&self, mut record: TemplateRecord, category: TemplateCategory) -> Result<()> {
        let mut all = self.list_all();
        let now = chrono::Utc::now().to_rfc3339();
        record.category = category;
        record.updated_at = now.clone();

        match all
            .iter_mut()
            .find(|t| t.id == record.id && t.category == category)
        {
            Some(existing) => {
                record.created_at = existing.created_at.clone();
                debug!("updating template '{}' ({category:?})", record.id);
                *existing = record;
            }
            None => {
                record.created_at = now;
                debug!("inserting template '{}' ({category:?})", record.id);
                all.push(record);
            }
        }

        storage::save_records(&*self.store, KEY_TEMPLATES, &all)
    }

    /// Every stored record, all categories, in storage order.
    ///
    /// Read failures degrade to an empty collection; "no prior data" is a
    /// valid state.
    #[must_use]
    pub fn list_all(&self) -> Vec<TemplateRecord> {
        storage::load_records(&*self.store, KEY_TEMPLATES)
    }

    /// Stored records of one category, in storage order.
    #[must_use]
    pub fn list_by_category(&self, category: TemplateCategory) -> Vec<TemplateRecord> {
        self.list_all()
            .into_iter()
            .filter(|t| t.category == category)
            .collect()
    }

    /// Remove at most one record matching `(id, category)`.
    ///
    /// Absent records are a no-op, not an error.
    pub fn remove(&self, id: &str, category: TemplateCategory) -> Result<()> {
        let mut all = self.list_all();
        let Some(pos) = all
            .iter()
            .position(|t| t.id == id && t.category == category)
        else {
            return Ok(());
        };

        all.remove(pos);
        debug!("removed template '{id}' ({category:?})");
        storage::save_records(&*self.store, KEY_TEMPLATES, &all)
    }

    /// Upsert each record in order under `category`.
    ///
    /// Not atomic: a failure partway leaves the records upserted so far
    /// committed.
    pub fn bulk_upsert(
        &self,
        records: Vec<TemplateRecord>,
        category: TemplateCategory,
    ) -> Result<()> {
        for record in records {
            self.upsert(record, category)?;
        }
        Ok(())
    }
}
