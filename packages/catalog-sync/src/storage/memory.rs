//! In-memory catalog store. Backs the test suite and mirrors the Postgres
//! store's semantics exactly: upserts preserve identity, creation metadata
//! and lifecycle state; sweeps are scoped by category.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::traits::CatalogStore;
use crate::types::{CatalogEntry, Category, NormalizedModel, SyncRun};

#[derive(Default)]
struct Inner {
    entries: HashMap<String, CatalogEntry>,
    runs: Vec<SyncRun>,
    lock_held: bool,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: Mutex<Inner>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one entry, for assertions.
    pub fn entry(&self, model_id: &str) -> Option<CatalogEntry> {
        self.inner.lock().unwrap().entries.get(model_id).cloned()
    }

    /// All run log records, oldest first.
    pub fn run_log(&self) -> Vec<SyncRun> {
        self.inner.lock().unwrap().runs.clone()
    }

    /// Pre-hold the run lock, to simulate a concurrent run.
    pub fn hold_lock(&self) {
        self.inner.lock().unwrap().lock_held = true;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn find_by_model_id(&self, model_id: &str) -> Result<Option<CatalogEntry>> {
        Ok(self.entry(model_id))
    }

    async fn upsert(&self, model: &NormalizedModel, now: DateTime<Utc>) -> Result<()> {
        let (price_amount, price_kind, price_source) = model.price.columns();
        let attributes = serde_json::to_value(&model.attributes)?;

        let mut inner = self.inner.lock().unwrap();
        match inner.entries.get_mut(&model.id) {
            Some(entry) => {
                entry.name = model.name.clone();
                entry.provider = model.provider.clone();
                entry.description = model.description.clone();
                entry.price_amount = price_amount;
                entry.price_kind = price_kind;
                entry.price_source = price_source;
                entry.tags = model.tags.clone();
                entry.popularity = model.popularity;
                entry.run_count = model.run_count;
                entry.attributes = attributes;
                entry.source_updated_at = model.updated_at;
                entry.updated_at = now;
            }
            None => {
                inner.entries.insert(
                    model.id.clone(),
                    CatalogEntry {
                        model_id: model.id.clone(),
                        category: model.category,
                        name: model.name.clone(),
                        provider: model.provider.clone(),
                        description: model.description.clone(),
                        price_amount,
                        price_kind,
                        price_source,
                        tags: model.tags.clone(),
                        popularity: model.popularity,
                        run_count: model.run_count,
                        attributes,
                        source_updated_at: model.updated_at,
                        created_at: now,
                        updated_at: now,
                        deleted_at: None,
                    },
                );
            }
        }
        Ok(())
    }

    async fn list_active_ids(&self, categories: &[Category]) -> Result<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let mut ids: Vec<String> = inner
            .entries
            .values()
            .filter(|e| e.is_active() && categories.contains(&e.category))
            .map(|e| e.model_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn list_deleted_ids(&self, categories: &[Category]) -> Result<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let mut ids: Vec<String> = inner
            .entries
            .values()
            .filter(|e| !e.is_active() && categories.contains(&e.category))
            .map(|e| e.model_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn soft_delete(&self, ids: &[String], at: DateTime<Utc>) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let mut affected = 0;
        for id in ids {
            if let Some(entry) = inner.entries.get_mut(id) {
                if entry.deleted_at.is_none() {
                    entry.deleted_at = Some(at);
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }

    async fn restore(&self, ids: &[String]) -> Result<u64> {
        let mut inner = self.inner.lock().unwrap();
        let mut affected = 0;
        for id in ids {
            if let Some(entry) = inner.entries.get_mut(id) {
                if entry.deleted_at.is_some() {
                    entry.deleted_at = None;
                    affected += 1;
                }
            }
        }
        Ok(affected)
    }

    async fn append_run_log(&self, run: &SyncRun) -> Result<()> {
        self.inner.lock().unwrap().runs.push(run.clone());
        Ok(())
    }

    async fn try_acquire_run_lock(&self) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if inner.lock_held {
            return Ok(false);
        }
        inner.lock_held = true;
        Ok(true)
    }

    async fn release_run_lock(&self) -> Result<()> {
        self.inner.lock().unwrap().lock_held = false;
        Ok(())
    }
}
