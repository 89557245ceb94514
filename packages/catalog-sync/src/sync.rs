//! One pipeline run: fetch all categories concurrently, resolve prices under
//! a bounded concurrency cap, normalize, reconcile, and append a run log
//! record.
//!
//! Failure handling per layer:
//! - per-listing detail/page fetches degrade to "no data" inside the resolver
//! - a category whose listing fetch fails contributes nothing and is
//!   excluded from the soft-delete sweep
//! - a missing marketplace credential or an error escaping reconciliation
//!   fails the whole run; partial upserts are not rolled back
//!
//! A run holds the store's advisory lock for its duration so two concurrent
//! triggers never race the sweep.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::dedupe::{dedupe, dedupe_with_seen};
use crate::normalize::Normalizer;
use crate::pricing::PriceResolver;
use crate::providers::{collections, OpenRouterClient, ReplicateClient};
use crate::reconcile::{reconcile, ReconcileStats};
use crate::traits::CatalogStore;
use crate::types::{AudioKind, Category, CategoryCounts, NormalizedModel, SyncRun};

/// Cap on concurrent per-listing detail/page fetches within one category,
/// chosen to stay inside marketplace rate limits.
pub const MAX_CONCURRENT_DETAIL_FETCHES: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct SyncSummary {
    pub counts: CategoryCounts,
    pub stats: ReconcileStats,
    pub duration_ms: i64,
}

#[derive(Debug)]
pub enum SyncReport {
    Completed(SyncSummary),
    /// Another run holds the advisory lock; nothing was fetched or written.
    SkippedLocked,
}

/// Outcome of one category's fetch. `Partial` means some but not all of the
/// category's source collections responded: the fetched models are still
/// upserted, but the category sits out the soft-delete sweep.
enum CategoryFetch {
    Complete(Vec<NormalizedModel>),
    Partial(Vec<NormalizedModel>),
    Failed,
}

fn audio_kind_for(slug: &str) -> Option<AudioKind> {
    match slug {
        collections::SPEECH_RECOGNITION => Some(AudioKind::Stt),
        collections::TEXT_TO_SPEECH => Some(AudioKind::Tts),
        _ => None,
    }
}

pub struct SyncService {
    store: Arc<dyn CatalogStore>,
    openrouter: OpenRouterClient,
    replicate: Option<Arc<ReplicateClient>>,
    resolver: Option<Arc<PriceResolver>>,
    text_resolver: Arc<PriceResolver>,
    normalizer: Arc<Normalizer>,
}

impl SyncService {
    pub fn new(store: Arc<dyn CatalogStore>, replicate_token: Option<String>) -> Result<Self> {
        let replicate = replicate_token
            .map(ReplicateClient::new)
            .transpose()?
            .map(Arc::new);
        Ok(Self::with_clients(store, OpenRouterClient::new()?, replicate))
    }

    pub fn with_clients(
        store: Arc<dyn CatalogStore>,
        openrouter: OpenRouterClient,
        replicate: Option<Arc<ReplicateClient>>,
    ) -> Self {
        let resolver = replicate
            .clone()
            .map(|client| Arc::new(PriceResolver::new(client)));
        Self {
            store,
            openrouter,
            replicate,
            resolver,
            text_resolver: Arc::new(PriceResolver::offline()),
            normalizer: Arc::new(Normalizer::with_builtin()),
        }
    }

    /// Execute one sync run. Returns `SkippedLocked` when another run is in
    /// flight; errors after recording a failed run record otherwise.
    pub async fn run(&self) -> Result<SyncReport> {
        let started = Utc::now();
        let timer = Instant::now();

        let (replicate, resolver) = match (&self.replicate, &self.resolver) {
            (Some(replicate), Some(resolver)) => (replicate.clone(), resolver.clone()),
            _ => {
                let message = "REPLICATE_API_TOKEN not configured";
                error!("{}", message);
                let run =
                    SyncRun::failed(message.into(), timer.elapsed().as_millis() as i64, started);
                if let Err(e) = self.store.append_run_log(&run).await {
                    error!(error = %e, "failed to record failed sync run");
                }
                anyhow::bail!(message);
            }
        };

        if !self.store.try_acquire_run_lock().await? {
            warn!("another sync run holds the lock, skipping this trigger");
            return Ok(SyncReport::SkippedLocked);
        }

        let result = self.run_locked(&replicate, &resolver, started, timer).await;
        if let Err(e) = self.store.release_run_lock().await {
            error!(error = %e, "failed to release sync run lock");
        }
        result
    }

    async fn run_locked(
        &self,
        replicate: &Arc<ReplicateClient>,
        resolver: &Arc<PriceResolver>,
        started: DateTime<Utc>,
        timer: Instant,
    ) -> Result<SyncReport> {
        match self.execute(replicate, resolver).await {
            Ok((counts, stats)) => {
                let duration_ms = timer.elapsed().as_millis() as i64;
                let run = SyncRun::success(counts, duration_ms, started);
                self.store.append_run_log(&run).await?;
                info!(
                    total = counts.total(),
                    upserted = stats.upserted,
                    soft_deleted = stats.soft_deleted,
                    restored = stats.restored,
                    duration_ms,
                    "model catalog sync completed"
                );
                Ok(SyncReport::Completed(SyncSummary {
                    counts,
                    stats,
                    duration_ms,
                }))
            }
            Err(e) => {
                let duration_ms = timer.elapsed().as_millis() as i64;
                let run = SyncRun::failed(format!("{e:#}"), duration_ms, started);
                if let Err(log_err) = self.store.append_run_log(&run).await {
                    error!(error = %log_err, "failed to record failed sync run");
                }
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        replicate: &Arc<ReplicateClient>,
        resolver: &Arc<PriceResolver>,
    ) -> Result<(CategoryCounts, ReconcileStats)> {
        info!("starting model catalog sync");

        let (text, image, video, audio) = tokio::join!(
            self.fetch_text(),
            self.fetch_marketplace(
                replicate,
                resolver,
                Category::Image,
                &[collections::TEXT_TO_IMAGE],
            ),
            self.fetch_marketplace(
                replicate,
                resolver,
                Category::Video,
                &[collections::TEXT_TO_VIDEO],
            ),
            self.fetch_marketplace(
                replicate,
                resolver,
                Category::Audio,
                &[collections::SPEECH_RECOGNITION, collections::TEXT_TO_SPEECH],
            ),
        );

        let mut counts = CategoryCounts::default();
        let mut records: Vec<NormalizedModel> = Vec::new();
        let mut swept: Vec<Category> = Vec::new();

        for (category, outcome) in [
            (Category::Text, text),
            (Category::Image, image),
            (Category::Video, video),
            (Category::Audio, audio),
        ] {
            match outcome {
                CategoryFetch::Complete(models) => {
                    counts.set(category, models.len() as i64);
                    swept.push(category);
                    records.extend(models);
                }
                CategoryFetch::Partial(models) => {
                    warn!(%category, "partial category fetch; sitting out the soft-delete sweep");
                    counts.set(category, models.len() as i64);
                    records.extend(models);
                }
                CategoryFetch::Failed => {
                    warn!(%category, "category fetch failed; contributing no models this run");
                }
            }
        }

        let completed_at = Utc::now();
        let stats = reconcile(self.store.as_ref(), &records, &swept, completed_at).await?;
        Ok((counts, stats))
    }

    async fn fetch_text(&self) -> CategoryFetch {
        let listings = match self.openrouter.fetch_text_listings().await {
            Ok(listings) => listings,
            Err(e) => {
                warn!(error = %e, "text listing fetch failed");
                return CategoryFetch::Failed;
            }
        };

        let unique = dedupe(listings);
        let now = Utc::now();
        let mut models = Vec::with_capacity(unique.len());
        for listing in &unique {
            let price = self.text_resolver.resolve(listing, Category::Text).await;
            models.push(self.normalizer.normalize(listing, price, Category::Text, now));
        }
        CategoryFetch::Complete(models)
    }

    /// Fetch one marketplace category from its source collections, sharing a
    /// single dedup key set across collections, then resolve prices under
    /// the concurrency cap. Listing order is preserved.
    async fn fetch_marketplace(
        &self,
        replicate: &Arc<ReplicateClient>,
        resolver: &Arc<PriceResolver>,
        category: Category,
        slugs: &[&str],
    ) -> CategoryFetch {
        let mut seen = HashSet::new();
        let mut listings = Vec::new();
        let mut failures = 0usize;

        for slug in slugs {
            match replicate.fetch_collection(slug).await {
                Ok(mut batch) => {
                    let kind = audio_kind_for(slug);
                    for listing in &mut batch {
                        listing.audio_kind = kind;
                    }
                    listings.extend(dedupe_with_seen(&mut seen, batch));
                }
                Err(e) => {
                    warn!(%category, slug, error = %e, "collection fetch failed");
                    failures += 1;
                }
            }
        }
        if failures == slugs.len() {
            return CategoryFetch::Failed;
        }

        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_DETAIL_FETCHES));
        let mut handles = Vec::with_capacity(listings.len());
        for listing in listings {
            let semaphore = semaphore.clone();
            let replicate = replicate.clone();
            let resolver = resolver.clone();
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire().await.ok()?;
                let mut listing = listing;
                if listing.billing.is_none() {
                    listing.billing = replicate
                        .fetch_model_detail(&listing.owner, &listing.name)
                        .await;
                }
                let price = resolver.resolve(&listing, category).await;
                Some((listing, price))
            }));
        }

        let now = Utc::now();
        let mut models = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(Some((listing, price))) = handle.await {
                models.push(self.normalizer.normalize(&listing, price, category, now));
            }
        }

        if failures > 0 {
            CategoryFetch::Partial(models)
        } else {
            CategoryFetch::Complete(models)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCatalogStore;
    use crate::types::SyncStatus;

    #[tokio::test]
    async fn missing_marketplace_token_records_a_failed_run() {
        let store = Arc::new(MemoryCatalogStore::new());
        let service = SyncService::new(store.clone(), None).unwrap();

        let err = service.run().await.unwrap_err();
        assert!(err.to_string().contains("REPLICATE_API_TOKEN"));

        let runs = store.run_log();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, SyncStatus::Failed);
        assert!(runs[0].counts.is_none());
        assert!(runs[0]
            .error
            .as_deref()
            .unwrap()
            .contains("not configured"));
    }

    #[tokio::test]
    async fn held_lock_skips_the_run_without_touching_the_catalog() {
        let store = Arc::new(MemoryCatalogStore::new());
        store.hold_lock();
        let service = SyncService::new(store.clone(), Some("test-token".into())).unwrap();

        match service.run().await.unwrap() {
            SyncReport::SkippedLocked => {}
            other => panic!("expected skip, got {other:?}"),
        }
        assert!(store.run_log().is_empty());
        assert!(store.is_empty());
    }
}
