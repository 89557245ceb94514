//! Model catalog sync pipeline: harvest listings and pricing from upstream
//! catalogs, resolve a best-effort price per listing, normalize into unified
//! per-category records, and reconcile them into the persisted catalog with
//! a soft-delete/restore lifecycle.

pub mod data;
pub mod dedupe;
pub mod error;
pub mod normalize;
pub mod pricing;
pub mod providers;
pub mod reconcile;
pub mod storage;
pub mod sync;
pub mod traits;
pub mod types;

// Re-exports for clean API
pub use error::{FetchError, FetchResult};
pub use normalize::{CuratedData, Normalizer};
pub use pricing::{PriceResolver, PriceStrategy, StrategyOutcome};
pub use providers::{collections, OpenRouterClient, ReplicateClient};
pub use reconcile::{reconcile, ReconcileStats};
pub use storage::{MemoryCatalogStore, PostgresCatalogStore};
pub use sync::{SyncReport, SyncService, SyncSummary, MAX_CONCURRENT_DETAIL_FETCHES};
pub use traits::{CatalogStore, ModelPageFetcher};
pub use types::{
    AudioKind, Benchmark, BillingConfig, BillingTier, CatalogEntry, Category, CategoryAttributes,
    CategoryCounts, NormalizedModel, PriceKind, PriceResolution, PriceSource, RawListing,
    ResolvedPrice, SyncRun, SyncStatus,
};
