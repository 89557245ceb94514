use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FetchResult;
use crate::types::{CatalogEntry, Category, NormalizedModel, SyncRun};

/// Persistence contract for the catalog. The pipeline core depends only on
/// this trait; the storage technology behind it is an external collaborator.
///
/// All mutation goes through `upsert`, `soft_delete` and `restore`, each of
/// which is idempotent so retried runs never produce duplicate or
/// inconsistent entries.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_model_id(&self, model_id: &str) -> Result<Option<CatalogEntry>>;

    /// Insert a fresh active entry, or overwrite the mutable fields of an
    /// existing one in place. Identity, creation metadata, and lifecycle
    /// state are untouched on update.
    async fn upsert(&self, model: &NormalizedModel, now: DateTime<Utc>) -> Result<()>;

    /// Ids of active (not soft-deleted) entries in the given categories.
    async fn list_active_ids(&self, categories: &[Category]) -> Result<Vec<String>>;

    /// Ids of soft-deleted entries in the given categories.
    async fn list_deleted_ids(&self, categories: &[Category]) -> Result<Vec<String>>;

    /// Mark entries soft-deleted with the given timestamp. Entries already
    /// soft-deleted keep their original `deleted_at`. Returns rows affected.
    async fn soft_delete(&self, ids: &[String], at: DateTime<Utc>) -> Result<u64>;

    /// Clear `deleted_at` on the given entries. Returns rows affected.
    async fn restore(&self, ids: &[String]) -> Result<u64>;

    /// Append one run record. Write-once; never mutated afterwards.
    async fn append_run_log(&self, run: &SyncRun) -> Result<()>;

    /// Advisory run lock so two concurrent triggers never race the
    /// soft-delete sweep. Returns false when another run holds it.
    async fn try_acquire_run_lock(&self) -> Result<bool>;

    async fn release_run_lock(&self) -> Result<()>;
}

/// Fetches a provider's public per-model page, the fallback pricing source
/// for the page-scraping strategies. Seam so resolver tests can script pages
/// without a network.
#[async_trait]
pub trait ModelPageFetcher: Send + Sync {
    async fn fetch_page(&self, owner: &str, name: &str) -> FetchResult<String>;
}
