//! Catalog reconciliation: idempotent upserts followed by the
//! soft-delete/restore sweep.
//!
//! Upserts for a run always complete before the sweep executes, so a record
//! that flips from missing to present mid-run is never incorrectly
//! soft-deleted. The sweep universe is scoped to the categories whose
//! primary fetch succeeded this run: a provider outage degrades that
//! category's contribution to nothing instead of mass-deleting its entries.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::traits::CatalogStore;
use crate::types::{Category, NormalizedModel};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub upserted: usize,
    pub soft_deleted: u64,
    pub restored: u64,
}

/// Merge one run's normalized records into the persisted catalog.
///
/// `swept_categories` are the categories whose fetch completed this run;
/// only their entries participate in the soft-delete and restore sweeps.
pub async fn reconcile(
    store: &dyn CatalogStore,
    records: &[NormalizedModel],
    swept_categories: &[Category],
    completed_at: DateTime<Utc>,
) -> Result<ReconcileStats> {
    for record in records {
        store.upsert(record, completed_at).await?;
    }

    let present: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

    let active = store.list_active_ids(swept_categories).await?;
    let stale: Vec<String> = active
        .into_iter()
        .filter(|id| !present.contains(id.as_str()))
        .collect();
    let soft_deleted = if stale.is_empty() {
        0
    } else {
        info!(count = stale.len(), "soft deleting models no longer listed upstream");
        store.soft_delete(&stale, completed_at).await?
    };

    let deleted = store.list_deleted_ids(swept_categories).await?;
    let reappeared: Vec<String> = deleted
        .into_iter()
        .filter(|id| present.contains(id.as_str()))
        .collect();
    let restored = if reappeared.is_empty() {
        0
    } else {
        info!(count = reappeared.len(), "restoring models that reappeared upstream");
        store.restore(&reappeared).await?
    };

    Ok(ReconcileStats {
        upserted: records.len(),
        soft_deleted,
        restored,
    })
}
