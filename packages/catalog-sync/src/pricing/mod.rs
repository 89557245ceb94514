//! Layered price resolution.
//!
//! A listing's price is resolved by an ordered chain of strategies, each
//! implementing [`PriceStrategy`]: structured API billing fields, then the
//! billing configuration embedded in the public model page, then phrase
//! heuristics over the page text, then an offline estimate from the
//! listing's run count. The first accepted candidate wins.
//!
//! The resolver is total and fault-tolerant per listing: network failures at
//! any step mean "no candidate from this step", and the chain always
//! terminates in `Priced`, `Free` or `Unresolved`.

mod estimate;
mod page;
mod tiers;

pub use estimate::{static_estimate, StaticEstimateStrategy};
pub use page::{EmbeddedConfigStrategy, RegexHeuristicStrategy};
pub use tiers::StructuredFieldStrategy;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::traits::ModelPageFetcher;
use crate::types::{Category, PriceResolution, RawListing, ResolvedPrice};

/// What one strategy produced for a listing.
pub enum StrategyOutcome {
    /// A candidate price, still subject to the sanity band.
    Candidate(ResolvedPrice),
    /// The provider explicitly bills nothing; terminal.
    Free,
    /// Nothing usable from this strategy.
    Nothing,
}

/// Shared per-listing state for one resolution. The public model page is
/// fetched lazily and at most once, no matter how many strategies look at it.
pub struct PriceContext<'a> {
    pub listing: &'a RawListing,
    pub category: Category,
    fetcher: Option<&'a dyn ModelPageFetcher>,
    page: OnceCell<Option<String>>,
}

impl<'a> PriceContext<'a> {
    pub fn new(
        listing: &'a RawListing,
        category: Category,
        fetcher: Option<&'a dyn ModelPageFetcher>,
    ) -> Self {
        Self {
            listing,
            category,
            fetcher,
            page: OnceCell::new(),
        }
    }

    /// The listing's public detail page, or `None` when the fetch failed or
    /// no page source is configured. Failures are cached so a dead page is
    /// not re-fetched per strategy.
    pub async fn page(&self) -> Option<&str> {
        let fetcher = self.fetcher?;
        self.page
            .get_or_init(|| async move {
                match fetcher
                    .fetch_page(&self.listing.owner, &self.listing.name)
                    .await
                {
                    Ok(html) => Some(html),
                    Err(e) => {
                        debug!(
                            model = %self.listing.model_id(),
                            error = %e,
                            "detail page fetch failed, skipping page strategies"
                        );
                        None
                    }
                }
            })
            .await
            .as_deref()
    }
}

/// One step in the resolution chain.
#[async_trait]
pub trait PriceStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, ctx: &PriceContext<'_>) -> StrategyOutcome;
}

/// The ordered strategy chain. Candidates outside the open `(0, 100)` band
/// are discarded and the chain continues with the next strategy.
pub struct PriceResolver {
    fetcher: Option<Arc<dyn ModelPageFetcher>>,
    strategies: Vec<Box<dyn PriceStrategy>>,
}

impl PriceResolver {
    /// The standard chain: structured field, embedded page config, regex
    /// heuristics, static estimate.
    pub fn new(fetcher: Arc<dyn ModelPageFetcher>) -> Self {
        Self::with_strategies(
            Some(fetcher),
            vec![
                Box::new(StructuredFieldStrategy),
                Box::new(EmbeddedConfigStrategy),
                Box::new(RegexHeuristicStrategy),
                Box::new(StaticEstimateStrategy),
            ],
        )
    }

    /// Chain for listings that have no scrapeable detail page (the text
    /// aggregator): structured fields and the static estimate only.
    pub fn offline() -> Self {
        Self::with_strategies(
            None,
            vec![
                Box::new(StructuredFieldStrategy),
                Box::new(StaticEstimateStrategy),
            ],
        )
    }

    pub fn with_strategies(
        fetcher: Option<Arc<dyn ModelPageFetcher>>,
        strategies: Vec<Box<dyn PriceStrategy>>,
    ) -> Self {
        Self {
            fetcher,
            strategies,
        }
    }

    pub async fn resolve(&self, listing: &RawListing, category: Category) -> PriceResolution {
        let ctx = PriceContext::new(listing, category, self.fetcher.as_deref());

        for strategy in &self.strategies {
            match strategy.attempt(&ctx).await {
                StrategyOutcome::Candidate(price) => {
                    if ResolvedPrice::in_band(price.amount) {
                        debug!(
                            model = %listing.model_id(),
                            strategy = strategy.name(),
                            amount = price.amount,
                            "price resolved"
                        );
                        return PriceResolution::Priced(price);
                    }
                    debug!(
                        model = %listing.model_id(),
                        strategy = strategy.name(),
                        amount = price.amount,
                        "candidate outside sanity band, trying next strategy"
                    );
                }
                StrategyOutcome::Free => {
                    debug!(model = %listing.model_id(), "model is explicitly free");
                    return PriceResolution::Free;
                }
                StrategyOutcome::Nothing => {}
            }
        }

        PriceResolution::Unresolved
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::error::{FetchError, FetchResult};
    use crate::traits::ModelPageFetcher;

    /// Scripted page responses keyed by `owner/name`.
    pub enum PageScript {
        Html(String),
        Status(u16),
    }

    #[derive(Default)]
    pub struct ScriptedPageFetcher {
        pages: HashMap<String, PageScript>,
    }

    impl ScriptedPageFetcher {
        pub fn with_page(mut self, model_id: &str, html: &str) -> Self {
            self.pages
                .insert(model_id.to_string(), PageScript::Html(html.to_string()));
            self
        }

        pub fn with_status(mut self, model_id: &str, status: u16) -> Self {
            self.pages
                .insert(model_id.to_string(), PageScript::Status(status));
            self
        }
    }

    #[async_trait]
    impl ModelPageFetcher for ScriptedPageFetcher {
        async fn fetch_page(&self, owner: &str, name: &str) -> FetchResult<String> {
            let key = format!("{owner}/{name}");
            match self.pages.get(&key) {
                Some(PageScript::Html(html)) => Ok(html.clone()),
                Some(PageScript::Status(status)) => Err(FetchError::Http {
                    status: *status,
                    url: key,
                }),
                None => Err(FetchError::Http {
                    status: 404,
                    url: key,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::test_support::ScriptedPageFetcher;
    use super::*;
    use crate::types::{AudioKind, BillingConfig, BillingTier, PriceKind, PriceSource};

    fn resolver(fetcher: ScriptedPageFetcher) -> PriceResolver {
        PriceResolver::new(Arc::new(fetcher))
    }

    fn billing(price: serde_json::Value, unit: &str) -> BillingConfig {
        BillingConfig {
            billing_type: Some("usage".into()),
            metric: None,
            current_tiers: vec![BillingTier {
                price,
                unit: unit.into(),
                criteria: None,
            }],
        }
    }

    #[tokio::test]
    async fn structured_field_wins_when_present() {
        let mut listing = RawListing::new("stability-ai", "sdxl");
        listing.billing = Some(billing(serde_json::json!(0.0095), "per image"));

        let resolution = resolver(ScriptedPageFetcher::default())
            .resolve(&listing, Category::Image)
            .await;

        match resolution {
            PriceResolution::Priced(p) => {
                assert_eq!(p.amount, 0.0095);
                assert_eq!(p.kind, PriceKind::PerOutput);
                assert_eq!(p.source, PriceSource::StructuredField);
            }
            other => panic!("expected priced, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn out_of_band_structured_candidate_falls_through() {
        let mut listing = RawListing::new("a", "m");
        listing.run_count = 2_000_000;
        // 250 per image fails the band check, so the chain should end at the
        // static estimate instead.
        listing.billing = Some(billing(serde_json::json!(250.0), "per image"));

        let resolution = resolver(ScriptedPageFetcher::default())
            .resolve(&listing, Category::Image)
            .await;

        match resolution {
            PriceResolution::Priced(p) => {
                assert_eq!(p.source, PriceSource::StaticEstimate);
                assert!(ResolvedPrice::in_band(p.amount));
            }
            other => panic!("expected static estimate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn band_boundaries_are_open() {
        for (amount, expect_structured) in [
            (0.0, false),
            (0.0001, true),
            (99.9999, true),
            (100.0, false),
        ] {
            let mut listing = RawListing::new("a", "m");
            listing.billing = Some(billing(serde_json::json!(amount), "per image"));

            let resolution = resolver(ScriptedPageFetcher::default())
                .resolve(&listing, Category::Image)
                .await;

            match resolution {
                PriceResolution::Priced(p) if p.source == PriceSource::StructuredField => {
                    assert!(expect_structured, "amount {amount} should have been rejected");
                    assert_eq!(p.amount, amount);
                }
                PriceResolution::Priced(p) => {
                    assert!(!expect_structured, "amount {amount} should have been accepted");
                    assert_eq!(p.source, PriceSource::StaticEstimate);
                }
                other => panic!("resolver must stay total, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn detail_page_500_falls_through_to_static_estimate() {
        let mut listing = RawListing::new("a", "m");
        listing.run_count = 500_000;

        let fetcher = ScriptedPageFetcher::default().with_status("a/m", 500);
        let resolution = resolver(fetcher).resolve(&listing, Category::Video).await;

        match resolution {
            PriceResolution::Priced(p) => {
                assert_eq!(p.source, PriceSource::StaticEstimate);
                assert_eq!(p.kind, PriceKind::PerSecond);
                assert!(ResolvedPrice::in_band(p.amount));
            }
            other => panic!("expected static estimate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolver_is_total_for_text_without_any_data() {
        // No structured prices, no reachable pages, no static table for text:
        // the chain must end in Unresolved, never an error.
        let listing = RawListing::new("vendor", "chat-model");
        let resolution = resolver(ScriptedPageFetcher::default())
            .resolve(&listing, Category::Text)
            .await;
        assert_eq!(resolution, PriceResolution::Unresolved);
    }

    #[tokio::test]
    async fn text_structured_price_uses_completion_per_million() {
        let mut listing = RawListing::new("vendor", "chat-model");
        listing.prompt_price = Some(3.0);
        listing.completion_price = Some(15.0);

        let resolution = resolver(ScriptedPageFetcher::default())
            .resolve(&listing, Category::Text)
            .await;

        match resolution {
            PriceResolution::Priced(p) => {
                assert_eq!(p.amount, 15.0);
                assert_eq!(p.kind, PriceKind::PerMillionTokens);
                assert_eq!(p.source, PriceSource::StructuredField);
            }
            other => panic!("expected priced, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn embedded_config_is_read_from_the_page() {
        let html = r#"<html><body><script>
            window.__DATA__ = {"model":{"owner":"a","billing_config":{"billing_type":"usage","current_tiers":[{"price":"$0.12","unit":"per second"}]}}};
        </script></body></html>"#;
        let mut listing = RawListing::new("a", "m");
        listing.run_count = 10;

        let fetcher = ScriptedPageFetcher::default().with_page("a/m", html);
        let resolution = resolver(fetcher).resolve(&listing, Category::Video).await;

        match resolution {
            PriceResolution::Priced(p) => {
                assert_eq!(p.amount, 0.12);
                assert_eq!(p.kind, PriceKind::PerSecond);
                assert_eq!(p.source, PriceSource::EmbeddedConfig);
            }
            other => panic!("expected embedded config price, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicitly_empty_billing_config_is_free_not_unresolved() {
        let html = r#"<html><script>{"billing_config":{"current_tiers":[]}}</script></html>"#;
        let listing = RawListing::new("a", "m");

        let fetcher = ScriptedPageFetcher::default().with_page("a/m", html);
        let resolution = resolver(fetcher).resolve(&listing, Category::Image).await;
        assert_eq!(resolution, PriceResolution::Free);
    }

    #[tokio::test]
    async fn regex_heuristic_reads_phrases_from_page_text() {
        let html = r#"<html><body>
            <p>Run time and cost</p>
            <p>This model costs approximately $0.046 per second of output.</p>
        </body></html>"#;
        let mut listing = RawListing::new("a", "m");
        listing.audio_kind = Some(AudioKind::Stt);

        let fetcher = ScriptedPageFetcher::default().with_page("a/m", html);
        let resolution = resolver(fetcher).resolve(&listing, Category::Video).await;

        match resolution {
            PriceResolution::Priced(p) => {
                assert_eq!(p.amount, 0.046);
                assert_eq!(p.kind, PriceKind::PerSecond);
                assert_eq!(p.source, PriceSource::RegexHeuristic);
            }
            other => panic!("expected regex heuristic price, got {other:?}"),
        }
    }
}
