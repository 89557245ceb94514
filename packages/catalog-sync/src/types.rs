use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Model category. Each category carries its own economics: the divisor that
/// maps raw run counts onto the 0-100 popularity scale, the run-count
/// threshold for the "popular" tag, and the canonical pricing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Text,
    Image,
    Video,
    Audio,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Text,
        Category::Image,
        Category::Video,
        Category::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "text" => Some(Category::Text),
            "image" => Some(Category::Image),
            "video" => Some(Category::Video),
            "audio" => Some(Category::Audio),
            _ => None,
        }
    }

    /// Divisor mapping run counts to popularity. Image models see an order of
    /// magnitude more runs than video/audio models, so they use a coarser
    /// divisor to keep the 0-100 range meaningful.
    pub fn popularity_divisor(&self) -> u64 {
        match self {
            Category::Image => 100_000,
            _ => 10_000,
        }
    }

    /// Run count above which a model earns the "popular" tag. The text
    /// aggregator exposes no run counts, so text never crosses it.
    pub fn popular_threshold(&self) -> u64 {
        match self {
            Category::Text => u64::MAX,
            Category::Image => 1_000_000,
            Category::Video | Category::Audio => 100_000,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an audio model transcribes speech or synthesizes it. Determines
/// the canonical pricing unit (per minute of audio vs. per character of text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    Stt,
    Tts,
}

/// One billing tier from a marketplace billing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingTier {
    /// Numeric in the API response, currency-prefixed string on scraped
    /// pages. Kept raw; the price resolver extracts the decimal.
    pub price: serde_json::Value,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub criteria: Option<serde_json::Value>,
}

/// Embedded billing configuration, as returned by the marketplace detail API
/// or embedded in public model pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub billing_type: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub current_tiers: Vec<BillingTier>,
}

impl BillingConfig {
    pub fn first_tier(&self) -> Option<&BillingTier> {
        self.current_tiers.first()
    }
}

/// A raw model entry as returned by a provider's catalog endpoint. Exists
/// only within one fetch cycle; never persisted directly.
#[derive(Debug, Clone)]
pub struct RawListing {
    pub owner: String,
    pub name: String,
    pub description: String,
    pub run_count: u64,
    /// Structured billing from the detail API, when the provider exposes it.
    pub billing: Option<BillingConfig>,
    /// Provider-side timestamp of the latest model version, when known.
    pub updated_at: Option<DateTime<Utc>>,
    /// Display name supplied by the provider itself (text aggregator only).
    pub display_name: Option<String>,
    /// Per-million-token prices from the text aggregator.
    pub prompt_price: Option<f64>,
    pub completion_price: Option<f64>,
    pub context_length: Option<i32>,
    pub audio_kind: Option<AudioKind>,
}

impl RawListing {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            description: String::new(),
            run_count: 0,
            billing: None,
            updated_at: None,
            display_name: None,
            prompt_price: None,
            completion_price: None,
            context_length: None,
            audio_kind: None,
        }
    }

    /// Composite key, stable across runs: `owner/name`.
    pub fn model_id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Pricing unit. Closed set; every resolved price carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKind {
    PerMillionTokens,
    PerOutput,
    PerSecond,
    PerMinute,
    PerCharacter,
    /// The provider explicitly bills nothing for this model.
    Free,
}

impl PriceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceKind::PerMillionTokens => "per_million_tokens",
            PriceKind::PerOutput => "per_output",
            PriceKind::PerSecond => "per_second",
            PriceKind::PerMinute => "per_minute",
            PriceKind::PerCharacter => "per_character",
            PriceKind::Free => "free",
        }
    }

    pub fn parse(s: &str) -> Option<PriceKind> {
        match s {
            "per_million_tokens" => Some(PriceKind::PerMillionTokens),
            "per_output" => Some(PriceKind::PerOutput),
            "per_second" => Some(PriceKind::PerSecond),
            "per_minute" => Some(PriceKind::PerMinute),
            "per_character" => Some(PriceKind::PerCharacter),
            "free" => Some(PriceKind::Free),
            _ => None,
        }
    }

    /// The unit a category's prices are quoted in when tier metadata is
    /// ambiguous. Audio depends on whether the model transcribes or
    /// synthesizes.
    pub fn canonical(category: Category, audio_kind: Option<AudioKind>) -> PriceKind {
        match category {
            Category::Text => PriceKind::PerMillionTokens,
            Category::Image => PriceKind::PerOutput,
            Category::Video => PriceKind::PerSecond,
            Category::Audio => match audio_kind {
                Some(AudioKind::Tts) => PriceKind::PerCharacter,
                _ => PriceKind::PerMinute,
            },
        }
    }
}

/// Which strategy produced a resolved price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    StructuredField,
    EmbeddedConfig,
    RegexHeuristic,
    StaticEstimate,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::StructuredField => "structured_field",
            PriceSource::EmbeddedConfig => "embedded_config",
            PriceSource::RegexHeuristic => "regex_heuristic",
            PriceSource::StaticEstimate => "static_estimate",
        }
    }

    pub fn parse(s: &str) -> Option<PriceSource> {
        match s {
            "structured_field" => Some(PriceSource::StructuredField),
            "embedded_config" => Some(PriceSource::EmbeddedConfig),
            "regex_heuristic" => Some(PriceSource::RegexHeuristic),
            "static_estimate" => Some(PriceSource::StaticEstimate),
            _ => None,
        }
    }
}

/// A price candidate accepted by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub amount: f64,
    pub kind: PriceKind,
    pub source: PriceSource,
}

impl ResolvedPrice {
    /// Sanity band for candidate amounts, in currency units. The interval is
    /// open on both ends: zero means "free", which is modeled separately, and
    /// anything at or above 100 per unit is assumed to be a parsing artifact.
    pub fn in_band(amount: f64) -> bool {
        amount > 0.0 && amount < 100.0
    }
}

/// Outcome of price resolution for one listing.
///
/// `Free` is terminal and distinct from `Unresolved`: it is only produced
/// when a fetched billing configuration explicitly carries no tiers, i.e. the
/// provider is known to bill nothing. `Unresolved` means every strategy came
/// up empty and callers must persist an absent price.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceResolution {
    Priced(ResolvedPrice),
    Free,
    Unresolved,
}

impl PriceResolution {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, PriceResolution::Unresolved)
    }

    /// Persisted representation: (amount, kind, source).
    pub fn columns(&self) -> (Option<f64>, Option<PriceKind>, Option<PriceSource>) {
        match self {
            PriceResolution::Priced(p) => (Some(p.amount), Some(p.kind), Some(p.source)),
            PriceResolution::Free => (
                Some(0.0),
                Some(PriceKind::Free),
                Some(PriceSource::EmbeddedConfig),
            ),
            PriceResolution::Unresolved => (None, None, None),
        }
    }
}

/// Curated benchmark scores for text models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub mmlu: Option<f32>,
    pub gpqa: Option<f32>,
    pub human_eval: Option<f32>,
    pub swe_bench: Option<f32>,
    pub live_code_bench: Option<f32>,
    pub math: Option<f32>,
    pub speed: Option<f32>,
    pub latency: Option<f32>,
    pub arena_elo: Option<f32>,
}

impl Benchmark {
    /// Average of the available coding benchmarks, rounded to one decimal.
    pub fn coding_score(&self) -> Option<f32> {
        let scores: Vec<f32> = [self.human_eval, self.swe_bench, self.live_code_bench]
            .into_iter()
            .flatten()
            .collect();
        if scores.is_empty() {
            return None;
        }
        let avg = scores.iter().sum::<f32>() / scores.len() as f32;
        Some((avg * 10.0).round() / 10.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttributes {
    pub context_length: i32,
    pub prompt_price: Option<f64>,
    pub completion_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<Benchmark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding_score: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttributes {
    pub supported_sizes: Vec<String>,
    pub styles: Vec<String>,
    pub quality_score: Option<f32>,
    pub speed_score: Option<f32>,
    pub max_resolution: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAttributes {
    pub max_duration_secs: i32,
    pub resolutions: Vec<String>,
    pub quality_score: Option<f32>,
    pub motion_score: Option<f32>,
    pub fps: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAttributes {
    pub kind: AudioKind,
    pub languages: Vec<String>,
    pub quality_score: Option<f32>,
    pub naturalness: Option<f32>,
    pub accuracy: Option<f32>,
}

/// Category-specific capability attributes of a normalized model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryAttributes {
    Text(TextAttributes),
    Image(ImageAttributes),
    Video(VideoAttributes),
    Audio(AudioAttributes),
}

/// The canonical, category-typed model record produced by the normalizer.
/// `id` is the `owner/name` composite and is globally unique within one
/// category dataset after deduplication.
#[derive(Debug, Clone)]
pub struct NormalizedModel {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: String,
    pub category: Category,
    pub price: PriceResolution,
    pub tags: Vec<String>,
    pub popularity: i32,
    pub run_count: i64,
    pub updated_at: DateTime<Utc>,
    pub attributes: CategoryAttributes,
}

impl NormalizedModel {
    pub fn audio_kind(&self) -> Option<AudioKind> {
        match &self.attributes {
            CategoryAttributes::Audio(a) => Some(a.kind),
            _ => None,
        }
    }
}

/// A persisted catalog row: a normalized model plus lifecycle state. Entries
/// are soft-deleted when a run no longer sees them and restored when they
/// reappear; the pipeline never hard-deletes.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub model_id: String,
    pub category: Category,
    pub name: String,
    pub provider: String,
    pub description: String,
    pub price_amount: Option<f64>,
    pub price_kind: Option<PriceKind>,
    pub price_source: Option<PriceSource>,
    pub tags: Vec<String>,
    pub popularity: i32,
    pub run_count: i64,
    pub attributes: serde_json::Value,
    pub source_updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Success,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "success",
            SyncStatus::Failed => "failed",
        }
    }
}

/// Per-category model counts for one run. `None` marks a category whose
/// listing fetch failed outright that run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub text: Option<i64>,
    pub image: Option<i64>,
    pub video: Option<i64>,
    pub audio: Option<i64>,
}

impl CategoryCounts {
    pub fn set(&mut self, category: Category, count: i64) {
        match category {
            Category::Text => self.text = Some(count),
            Category::Image => self.image = Some(count),
            Category::Video => self.video = Some(count),
            Category::Audio => self.audio = Some(count),
        }
    }

    pub fn total(&self) -> i64 {
        [self.text, self.image, self.video, self.audio]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// One record per pipeline execution. Append-only: written once at the end
/// of a run and never mutated.
#[derive(Debug, Clone)]
pub struct SyncRun {
    pub id: Uuid,
    pub status: SyncStatus,
    pub counts: Option<CategoryCounts>,
    pub duration_ms: i64,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl SyncRun {
    pub fn success(counts: CategoryCounts, duration_ms: i64, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            status: SyncStatus::Success,
            counts: Some(counts),
            duration_ms,
            error: None,
            started_at,
        }
    }

    pub fn failed(error: String, duration_ms: i64, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            status: SyncStatus::Failed,
            counts: None,
            duration_ms,
            error: Some(error),
            started_at,
        }
    }
}
