//! Page-scraping strategies: the billing configuration embedded in a model
//! page's script blocks, and phrase heuristics over the rendered page text.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

use super::tiers::price_from_config;
use super::{PriceContext, PriceStrategy, StrategyOutcome};
use crate::types::{AudioKind, BillingConfig, Category, PriceKind, PriceSource, ResolvedPrice};

const BILLING_MARKER: &str = "\"billing_config\"";

/// Extract the first balanced JSON object starting at the first `{`.
/// String contents and escapes are respected so embedded braces don't
/// unbalance the scan.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse the billing configuration following a `"billing_config"` marker.
/// An explicit `null` is a configuration with no tiers, i.e. known-free.
fn config_after_marker(text: &str) -> Option<BillingConfig> {
    let idx = text.find(BILLING_MARKER)?;
    let rest = text[idx + BILLING_MARKER.len()..].trim_start();
    let rest = rest.strip_prefix(':')?.trim_start();
    if rest.starts_with("null") {
        return Some(BillingConfig::default());
    }
    let object = extract_json_object(rest)?;
    serde_json::from_str(object).ok()
}

/// Locate an embedded billing-configuration block in page markup. Script
/// blocks are checked first; the raw document is the fallback.
pub(super) fn find_billing_config(html: &str) -> Option<BillingConfig> {
    let document = Html::parse_document(html);
    if let Ok(selector) = Selector::parse("script") {
        for script in document.select(&selector) {
            let body = script.text().collect::<String>();
            if let Some(config) = config_after_marker(&body) {
                return Some(config);
            }
        }
    }
    config_after_marker(html)
}

/// Visible text of the page, tags stripped.
fn page_text(html: &str) -> String {
    Html::parse_document(html).root_element().text().collect()
}

/// Strategy 2: billing configuration embedded in the public model page.
pub struct EmbeddedConfigStrategy;

#[async_trait]
impl PriceStrategy for EmbeddedConfigStrategy {
    fn name(&self) -> &'static str {
        "embedded_config"
    }

    async fn attempt(&self, ctx: &PriceContext<'_>) -> StrategyOutcome {
        let Some(html) = ctx.page().await else {
            return StrategyOutcome::Nothing;
        };
        match find_billing_config(html) {
            Some(config) if config.current_tiers.is_empty() => StrategyOutcome::Free,
            Some(config) => match price_from_config(
                &config,
                ctx.category,
                ctx.listing.audio_kind,
                PriceSource::EmbeddedConfig,
            ) {
                Some(price) => StrategyOutcome::Candidate(price),
                None => StrategyOutcome::Nothing,
            },
            None => StrategyOutcome::Nothing,
        }
    }
}

struct PhrasePattern {
    regex: Regex,
    kind: PriceKind,
    scale: f64,
}

fn pattern(expr: &str, kind: PriceKind, scale: f64) -> PhrasePattern {
    PhrasePattern {
        regex: Regex::new(expr).expect("phrase pattern"),
        kind,
        scale,
    }
}

lazy_static! {
    static ref IMAGE_PATTERNS: Vec<PhrasePattern> = vec![
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*image", PriceKind::PerOutput, 1.0),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*output", PriceKind::PerOutput, 1.0),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*sec(?:ond)?", PriceKind::PerSecond, 1.0),
    ];
    static ref VIDEO_PATTERNS: Vec<PhrasePattern> = vec![
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*sec(?:ond)?", PriceKind::PerSecond, 1.0),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*video", PriceKind::PerOutput, 1.0),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*output", PriceKind::PerOutput, 1.0),
    ];
    static ref AUDIO_STT_PATTERNS: Vec<PhrasePattern> = vec![
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*minute", PriceKind::PerMinute, 1.0),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*sec(?:ond)?", PriceKind::PerSecond, 1.0),
    ];
    static ref AUDIO_TTS_PATTERNS: Vec<PhrasePattern> = vec![
        pattern(
            r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*1000\s*characters",
            PriceKind::PerCharacter,
            0.001,
        ),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*character", PriceKind::PerCharacter, 1.0),
        pattern(r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*minute", PriceKind::PerMinute, 1.0),
    ];
    static ref TEXT_PATTERNS: Vec<PhrasePattern> = vec![
        pattern(
            r"(?i)\$([0-9]+(?:\.[0-9]+)?)\s*(?:per|/)\s*(?:1m|million)\s*tokens",
            PriceKind::PerMillionTokens,
            1.0,
        ),
    ];
}

fn patterns_for(category: Category, audio_kind: Option<AudioKind>) -> &'static [PhrasePattern] {
    match category {
        Category::Text => &TEXT_PATTERNS,
        Category::Image => &IMAGE_PATTERNS,
        Category::Video => &VIDEO_PATTERNS,
        Category::Audio => match audio_kind {
            Some(AudioKind::Tts) => &AUDIO_TTS_PATTERNS,
            _ => &AUDIO_STT_PATTERNS,
        },
    }
}

/// Strategy 3: known pricing phrases in the page text, in fixed priority
/// order per category. The first numeric match inside the sanity band wins.
pub struct RegexHeuristicStrategy;

#[async_trait]
impl PriceStrategy for RegexHeuristicStrategy {
    fn name(&self) -> &'static str {
        "regex_heuristic"
    }

    async fn attempt(&self, ctx: &PriceContext<'_>) -> StrategyOutcome {
        let Some(html) = ctx.page().await else {
            return StrategyOutcome::Nothing;
        };
        let text = page_text(html);

        for phrase in patterns_for(ctx.category, ctx.listing.audio_kind) {
            for caps in phrase.regex.captures_iter(&text) {
                let Some(amount) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok())
                else {
                    continue;
                };
                let amount = amount * phrase.scale;
                if ResolvedPrice::in_band(amount) {
                    return StrategyOutcome::Candidate(ResolvedPrice {
                        amount,
                        kind: phrase.kind,
                        source: PriceSource::RegexHeuristic,
                    });
                }
            }
        }
        StrategyOutcome::Nothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_object_extraction_respects_strings() {
        let text = r#"{"a": "closing } brace in string", "b": {"c": 1}} trailing"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"a": "closing } brace in string", "b": {"c": 1}}"#)
        );
        assert_eq!(extract_json_object("no braces"), None);
        assert_eq!(extract_json_object("{unterminated"), None);
    }

    #[test]
    fn billing_config_is_found_inside_script_blocks() {
        let html = r#"<html><script>var s = {"billing_config":{"current_tiers":[{"price":0.01,"unit":"per image"}]}};</script></html>"#;
        let config = find_billing_config(html).unwrap();
        assert_eq!(config.current_tiers.len(), 1);
    }

    #[test]
    fn null_billing_config_parses_as_empty() {
        let html = r#"<script>{"billing_config": null, "other": 1}</script>"#;
        let config = find_billing_config(html).unwrap();
        assert!(config.current_tiers.is_empty());
    }

    #[test]
    fn missing_marker_yields_none() {
        assert!(find_billing_config("<html><body>no pricing here</body></html>").is_none());
    }

    #[test]
    fn page_text_strips_markup() {
        let text = page_text("<html><body><p>costs <b>$0.05</b> per image</p></body></html>");
        assert!(text.contains("costs $0.05 per image"));
    }

    #[test]
    fn tts_thousand_character_phrase_is_scaled() {
        let phrase = &AUDIO_TTS_PATTERNS[0];
        let caps = phrase
            .regex
            .captures("Pricing: $0.80 per 1000 characters generated")
            .unwrap();
        let amount: f64 = caps.get(1).unwrap().as_str().parse().unwrap();
        assert!((amount * phrase.scale - 0.0008).abs() < 1e-12);
    }
}
