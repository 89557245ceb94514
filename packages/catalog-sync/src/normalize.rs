//! Maps a raw provider listing plus its resolved price into the unified
//! model record for its category.
//!
//! All lookup tables (provider display names, curated capability metadata,
//! text benchmarks) are injected immutable data, so the normalizer is pure:
//! the same listing, price and clock always produce the same record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AudioAttributes, AudioKind, Benchmark, Category, CategoryAttributes, ImageAttributes,
    NormalizedModel, PriceResolution, RawListing, TextAttributes, VideoAttributes,
};

/// Curated capability metadata for an image model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageMeta {
    pub quality_score: Option<f32>,
    pub speed_score: Option<f32>,
    pub max_resolution: Option<String>,
    pub supported_sizes: Option<Vec<String>>,
    pub styles: Option<Vec<String>>,
}

/// Curated capability metadata for a video model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMeta {
    pub quality_score: Option<f32>,
    pub motion_score: Option<f32>,
    pub fps: Option<i32>,
    pub max_duration_secs: Option<i32>,
    pub resolutions: Option<Vec<String>>,
}

/// Curated capability metadata for an audio model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioMeta {
    pub quality_score: Option<f32>,
    pub naturalness: Option<f32>,
    pub accuracy: Option<f32>,
    pub languages: Option<Vec<String>>,
}

/// Immutable lookup tables handed to the normalizer. `BTreeMap` keeps the
/// prefix-matching benchmark fallback deterministic.
#[derive(Debug, Clone, Default)]
pub struct CuratedData {
    pub provider_names: BTreeMap<String, String>,
    pub benchmarks: BTreeMap<String, Benchmark>,
    pub image_meta: BTreeMap<String, ImageMeta>,
    pub video_meta: BTreeMap<String, VideoMeta>,
    pub audio_meta: BTreeMap<String, AudioMeta>,
}

impl CuratedData {
    /// Benchmark lookup: exact key first, then prefix matching against the
    /// version-suffix-stripped id in either direction, so `vendor/model:beta`
    /// and dated releases still match their curated row.
    pub fn benchmark(&self, model_id: &str) -> Option<&Benchmark> {
        if let Some(found) = self.benchmarks.get(model_id) {
            return Some(found);
        }
        let base_id = model_id.split(':').next().unwrap_or(model_id);
        self.benchmarks
            .iter()
            .find(|(key, _)| base_id.starts_with(key.as_str()) || key.starts_with(base_id))
            .map(|(_, bench)| bench)
    }
}

/// Turn a hyphen-delimited slug into a display title: space-joined, each
/// word capitalized.
pub fn title_case_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct Normalizer {
    curated: CuratedData,
}

impl Normalizer {
    pub fn new(curated: CuratedData) -> Self {
        Self { curated }
    }

    /// Normalizer loaded with the built-in curated tables.
    pub fn with_builtin() -> Self {
        Self::new(crate::data::builtin())
    }

    /// Provider display name: curated lookup, title-cased slug for unknown
    /// owners.
    pub fn provider_display(&self, owner: &str) -> String {
        self.curated
            .provider_names
            .get(owner)
            .cloned()
            .unwrap_or_else(|| title_case_slug(owner))
    }

    pub fn normalize(
        &self,
        listing: &RawListing,
        price: PriceResolution,
        category: Category,
        now: DateTime<Utc>,
    ) -> NormalizedModel {
        let id = listing.model_id();
        let provider = self.provider_display(&listing.owner);
        let name = listing.display_name.clone().unwrap_or_else(|| {
            format!("{}: {}", provider, title_case_slug(&listing.name))
        });

        let divisor = category.popularity_divisor();
        let popularity = (listing.run_count / divisor).min(100) as i32;
        let tags = if listing.run_count > category.popular_threshold() {
            vec!["popular".to_string()]
        } else {
            Vec::new()
        };

        NormalizedModel {
            attributes: self.attributes(listing, category, &id),
            id,
            name,
            provider,
            description: listing.description.clone(),
            category,
            price,
            tags,
            popularity,
            run_count: listing.run_count as i64,
            updated_at: listing.updated_at.unwrap_or(now),
        }
    }

    fn attributes(
        &self,
        listing: &RawListing,
        category: Category,
        model_id: &str,
    ) -> CategoryAttributes {
        match category {
            Category::Text => {
                let benchmark = self.curated.benchmark(model_id).cloned();
                let coding_score = benchmark.as_ref().and_then(Benchmark::coding_score);
                CategoryAttributes::Text(TextAttributes {
                    context_length: listing.context_length.unwrap_or(0),
                    prompt_price: listing.prompt_price,
                    completion_price: listing.completion_price,
                    benchmark,
                    coding_score,
                })
            }
            Category::Image => {
                let meta = self.curated.image_meta.get(model_id);
                CategoryAttributes::Image(ImageAttributes {
                    supported_sizes: meta
                        .and_then(|m| m.supported_sizes.clone())
                        .unwrap_or_else(|| vec!["1024x1024".into(), "512x512".into()]),
                    styles: meta
                        .and_then(|m| m.styles.clone())
                        .unwrap_or_else(|| vec!["photorealistic".into(), "artistic".into()]),
                    quality_score: meta.and_then(|m| m.quality_score),
                    speed_score: meta.and_then(|m| m.speed_score),
                    max_resolution: meta.and_then(|m| m.max_resolution.clone()),
                })
            }
            Category::Video => {
                let meta = self.curated.video_meta.get(model_id);
                CategoryAttributes::Video(VideoAttributes {
                    max_duration_secs: meta.and_then(|m| m.max_duration_secs).unwrap_or(10),
                    resolutions: meta
                        .and_then(|m| m.resolutions.clone())
                        .unwrap_or_else(|| vec!["720p".into(), "1080p".into()]),
                    quality_score: meta.and_then(|m| m.quality_score),
                    motion_score: meta.and_then(|m| m.motion_score),
                    fps: meta.and_then(|m| m.fps),
                })
            }
            Category::Audio => {
                let kind = listing.audio_kind.unwrap_or(AudioKind::Stt);
                let meta = self.curated.audio_meta.get(model_id);
                let default_languages: Vec<String> = match kind {
                    AudioKind::Stt => ["en", "ko", "ja", "zh", "es", "fr", "de"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                    AudioKind::Tts => vec!["en".into()],
                };
                CategoryAttributes::Audio(AudioAttributes {
                    kind,
                    languages: meta
                        .and_then(|m| m.languages.clone())
                        .unwrap_or(default_languages),
                    quality_score: meta.and_then(|m| m.quality_score),
                    naturalness: meta.and_then(|m| m.naturalness),
                    accuracy: meta.and_then(|m| m.accuracy),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriceKind, PriceSource, ResolvedPrice};

    fn curated() -> CuratedData {
        let mut data = CuratedData::default();
        data.provider_names
            .insert("stability-ai".into(), "Stability AI".into());
        data.benchmarks.insert(
            "openai/gpt-4o".into(),
            Benchmark {
                mmlu: Some(88.7),
                human_eval: Some(90.2),
                ..Default::default()
            },
        );
        data
    }

    #[test]
    fn title_casing_joins_hyphenated_words() {
        assert_eq!(title_case_slug("black-forest-labs"), "Black Forest Labs");
        assert_eq!(title_case_slug("sdxl"), "Sdxl");
    }

    #[test]
    fn display_name_uses_curated_provider_with_title_case_fallback() {
        let normalizer = Normalizer::new(curated());
        assert_eq!(normalizer.provider_display("stability-ai"), "Stability AI");
        assert_eq!(normalizer.provider_display("some-new-lab"), "Some New Lab");

        let mut listing = RawListing::new("stability-ai", "sdxl-turbo");
        listing.run_count = 5_000_000;
        let model = normalizer.normalize(
            &listing,
            PriceResolution::Unresolved,
            Category::Image,
            Utc::now(),
        );
        assert_eq!(model.name, "Stability AI: Sdxl Turbo");
        assert_eq!(model.provider, "Stability AI");
    }

    #[test]
    fn popularity_is_divided_and_capped() {
        let normalizer = Normalizer::new(CuratedData::default());
        let mut listing = RawListing::new("a", "m");
        listing.run_count = 2_500_000;
        let model = normalizer.normalize(
            &listing,
            PriceResolution::Unresolved,
            Category::Image,
            Utc::now(),
        );
        // 2.5M runs / 100k divisor
        assert_eq!(model.popularity, 25);
        assert_eq!(model.tags, vec!["popular".to_string()]);

        listing.run_count = 50_000_000;
        let capped = normalizer.normalize(
            &listing,
            PriceResolution::Unresolved,
            Category::Image,
            Utc::now(),
        );
        assert_eq!(capped.popularity, 100);
    }

    #[test]
    fn popular_tag_respects_category_threshold() {
        let normalizer = Normalizer::new(CuratedData::default());
        let mut listing = RawListing::new("a", "m");
        listing.run_count = 150_000;
        listing.audio_kind = Some(AudioKind::Stt);

        let audio = normalizer.normalize(
            &listing,
            PriceResolution::Unresolved,
            Category::Audio,
            Utc::now(),
        );
        assert_eq!(audio.tags, vec!["popular".to_string()]);

        let image = normalizer.normalize(
            &listing,
            PriceResolution::Unresolved,
            Category::Image,
            Utc::now(),
        );
        assert!(image.tags.is_empty());
    }

    #[test]
    fn benchmark_prefix_matching_falls_back() {
        let data = curated();
        assert!(data.benchmark("openai/gpt-4o").is_some());
        assert!(data.benchmark("openai/gpt-4o:extended").is_some());
        assert!(data.benchmark("openai/gpt-4o-2024-11-20").is_some());
        assert!(data.benchmark("openai/o9-unknown").is_none());
    }

    #[test]
    fn normalize_is_deterministic() {
        let normalizer = Normalizer::new(curated());
        let mut listing = RawListing::new("stability-ai", "sdxl");
        listing.run_count = 42;
        let now = Utc::now();
        let price = PriceResolution::Priced(ResolvedPrice {
            amount: 0.01,
            kind: PriceKind::PerOutput,
            source: PriceSource::StructuredField,
        });

        let a = normalizer.normalize(&listing, price.clone(), Category::Image, now);
        let b = normalizer.normalize(&listing, price, Category::Image, now);
        assert_eq!(a.name, b.name);
        assert_eq!(a.popularity, b.popularity);
        assert_eq!(a.updated_at, b.updated_at);
        assert_eq!(a.attributes, b.attributes);
    }

    #[test]
    fn audio_defaults_track_direction() {
        let normalizer = Normalizer::new(CuratedData::default());
        let mut listing = RawListing::new("a", "voice");
        listing.audio_kind = Some(AudioKind::Tts);
        let model = normalizer.normalize(
            &listing,
            PriceResolution::Unresolved,
            Category::Audio,
            Utc::now(),
        );
        match model.attributes {
            CategoryAttributes::Audio(ref a) => {
                assert_eq!(a.kind, AudioKind::Tts);
                assert_eq!(a.languages, vec!["en".to_string()]);
            }
            _ => panic!("expected audio attributes"),
        }
    }
}
