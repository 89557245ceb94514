//! Billing-tier extraction shared by the structured-field and embedded-config
//! strategies: first tier, first price entry, currency-prefixed decimal,
//! thousand-scale division, keyword unit classification.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use super::{PriceContext, PriceStrategy, StrategyOutcome};
use crate::types::{
    AudioKind, BillingConfig, Category, PriceKind, PriceSource, ResolvedPrice,
};

lazy_static! {
    /// Fixed currency-prefixed decimal, e.g. `$0.000725` or `0.12`.
    static ref CURRENCY_AMOUNT: Regex =
        Regex::new(r"\$?\s*([0-9]+(?:\.[0-9]+)?)").expect("currency pattern");
}

/// Extract a decimal amount from a tier price entry. The API quotes numbers,
/// scraped pages quote currency-prefixed strings.
fn tier_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => CURRENCY_AMOUNT
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        _ => None,
    }
}

/// Classify a tier's documented unit by keyword, defaulting to the
/// category's canonical unit when the keywords are ambiguous.
fn classify_unit(unit: &str, category: Category, audio_kind: Option<AudioKind>) -> PriceKind {
    let text = unit.to_lowercase();
    if text.contains("image") {
        PriceKind::PerOutput
    } else if text.contains("second") || text.contains("duration") {
        PriceKind::PerSecond
    } else if text.contains("minute") {
        PriceKind::PerMinute
    } else if text.contains("character") {
        PriceKind::PerCharacter
    } else if text.contains("token") {
        PriceKind::PerMillionTokens
    } else if text.contains("output") {
        PriceKind::PerOutput
    } else {
        PriceKind::canonical(category, audio_kind)
    }
}

/// Parse the first tier of a billing configuration into a price candidate.
/// Returns `None` when there is no tier or no parseable amount.
pub(super) fn price_from_config(
    config: &BillingConfig,
    category: Category,
    audio_kind: Option<AudioKind>,
    source: PriceSource,
) -> Option<ResolvedPrice> {
    let tier = config.first_tier()?;
    let mut amount = tier_amount(&tier.price)?;

    // Units quoted per thousand ("per 1000 characters") are scaled down to
    // the single-unit price.
    let unit = tier.unit.to_lowercase();
    if unit.contains("thousand") || unit.contains("1000") {
        amount /= 1000.0;
    }

    Some(ResolvedPrice {
        amount,
        kind: classify_unit(&tier.unit, category, audio_kind),
        source,
    })
}

/// Strategy 1: the provider's API response already carries an explicit
/// billing structure, or (for the text aggregator) per-million-token prices.
pub struct StructuredFieldStrategy;

#[async_trait]
impl PriceStrategy for StructuredFieldStrategy {
    fn name(&self) -> &'static str {
        "structured_field"
    }

    async fn attempt(&self, ctx: &PriceContext<'_>) -> StrategyOutcome {
        if ctx.category == Category::Text {
            // The aggregator quotes prompt and completion per million tokens;
            // the completion (output) price is the canonical one.
            let amount = match (ctx.listing.completion_price, ctx.listing.prompt_price) {
                (Some(completion), _) if completion > 0.0 => completion,
                (_, Some(prompt)) => prompt,
                _ => return StrategyOutcome::Nothing,
            };
            return StrategyOutcome::Candidate(ResolvedPrice {
                amount,
                kind: PriceKind::PerMillionTokens,
                source: PriceSource::StructuredField,
            });
        }

        let Some(billing) = &ctx.listing.billing else {
            return StrategyOutcome::Nothing;
        };
        match price_from_config(
            billing,
            ctx.category,
            ctx.listing.audio_kind,
            PriceSource::StructuredField,
        ) {
            Some(price) => StrategyOutcome::Candidate(price),
            None => StrategyOutcome::Nothing,
        }
    }
}
