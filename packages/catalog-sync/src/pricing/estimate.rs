//! Offline price estimation from the listing's popularity signal. The
//! deterministic last step of the chain: it needs no network and always
//! terminates the resolver for marketplace categories.

use async_trait::async_trait;

use super::{PriceContext, PriceStrategy, StrategyOutcome};
use crate::types::{AudioKind, Category, PriceKind, PriceSource, ResolvedPrice};

/// Fixed run-count breakpoints per category. Heavily-run image and speech
/// models skew cheap and distilled, so their estimates fall with run count;
/// heavily-run video models skew premium, so theirs rise.
pub fn static_estimate(
    category: Category,
    audio_kind: Option<AudioKind>,
    run_count: u64,
) -> Option<ResolvedPrice> {
    let (amount, kind) = match category {
        // The text aggregator always quotes structured prices; there is no
        // sane offline estimate for a token price.
        Category::Text => return None,
        Category::Image => {
            let amount = match run_count {
                n if n >= 10_000_000 => 0.003,
                n if n >= 1_000_000 => 0.008,
                n if n >= 100_000 => 0.02,
                _ => 0.04,
            };
            (amount, PriceKind::PerOutput)
        }
        Category::Video => {
            let amount = match run_count {
                n if n >= 1_000_000 => 0.09,
                n if n >= 100_000 => 0.06,
                _ => 0.03,
            };
            (amount, PriceKind::PerSecond)
        }
        Category::Audio => match audio_kind {
            Some(AudioKind::Tts) => {
                let amount = match run_count {
                    n if n >= 1_000_000 => 0.00002,
                    n if n >= 100_000 => 0.00005,
                    _ => 0.0001,
                };
                (amount, PriceKind::PerCharacter)
            }
            _ => {
                let amount = match run_count {
                    n if n >= 1_000_000 => 0.005,
                    n if n >= 100_000 => 0.012,
                    _ => 0.025,
                };
                (amount, PriceKind::PerMinute)
            }
        },
    };

    Some(ResolvedPrice {
        amount,
        kind,
        source: PriceSource::StaticEstimate,
    })
}

/// Strategy 4: derive a price purely from the run count.
pub struct StaticEstimateStrategy;

#[async_trait]
impl PriceStrategy for StaticEstimateStrategy {
    fn name(&self) -> &'static str {
        "static_estimate"
    }

    async fn attempt(&self, ctx: &PriceContext<'_>) -> StrategyOutcome {
        match static_estimate(ctx.category, ctx.listing.audio_kind, ctx.listing.run_count) {
            Some(price) => StrategyOutcome::Candidate(price),
            None => StrategyOutcome::Nothing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_are_always_in_band() {
        for category in [Category::Image, Category::Video, Category::Audio] {
            for kind in [None, Some(AudioKind::Stt), Some(AudioKind::Tts)] {
                for run_count in [0, 50_000, 100_000, 999_999, 1_000_000, 25_000_000] {
                    let price = static_estimate(category, kind, run_count).unwrap();
                    assert!(
                        ResolvedPrice::in_band(price.amount),
                        "{category} {kind:?} {run_count} -> {}",
                        price.amount
                    );
                    assert_eq!(price.source, PriceSource::StaticEstimate);
                }
            }
        }
    }

    #[test]
    fn text_has_no_static_estimate() {
        assert!(static_estimate(Category::Text, None, 1_000_000).is_none());
    }

    #[test]
    fn image_estimates_fall_with_run_count() {
        let hot = static_estimate(Category::Image, None, 20_000_000).unwrap();
        let cold = static_estimate(Category::Image, None, 1_000).unwrap();
        assert!(hot.amount < cold.amount);
        assert_eq!(hot.kind, PriceKind::PerOutput);
    }

    #[test]
    fn video_estimates_rise_with_run_count() {
        let hot = static_estimate(Category::Video, None, 5_000_000).unwrap();
        let cold = static_estimate(Category::Video, None, 1_000).unwrap();
        assert!(hot.amount > cold.amount);
        assert_eq!(hot.kind, PriceKind::PerSecond);
    }

    #[test]
    fn audio_kind_selects_the_unit() {
        let stt = static_estimate(Category::Audio, Some(AudioKind::Stt), 10).unwrap();
        let tts = static_estimate(Category::Audio, Some(AudioKind::Tts), 10).unwrap();
        assert_eq!(stt.kind, PriceKind::PerMinute);
        assert_eq!(tts.kind, PriceKind::PerCharacter);
    }
}
