//! Built-in curated tables: provider display names, text-model benchmark
//! scores, and per-model capability metadata for the marketplace categories.
//!
//! All of this is best-effort enrichment joined by exact model key (prefix
//! fallback for benchmarks); a missing row never blocks normalization.

use std::collections::BTreeMap;

use crate::normalize::{AudioMeta, CuratedData, ImageMeta, VideoMeta};
use crate::types::Benchmark;

pub fn builtin() -> CuratedData {
    CuratedData {
        provider_names: provider_names(),
        benchmarks: benchmarks(),
        image_meta: image_meta(),
        video_meta: video_meta(),
        audio_meta: audio_meta(),
    }
}

fn provider_names() -> BTreeMap<String, String> {
    [
        ("stability-ai", "Stability AI"),
        ("black-forest-labs", "Black Forest Labs"),
        ("bytedance", "ByteDance"),
        ("lucataco", "Lucataco"),
        ("playgroundai", "Playground AI"),
        ("minimax", "MiniMax"),
        ("luma", "Luma"),
        ("tencent", "Tencent"),
        ("genmo", "Genmo"),
        ("openai", "OpenAI"),
        ("suno-ai", "Suno AI"),
        ("cjwbw", "CJWBW"),
        ("adirik", "Adirik"),
        ("meta", "Meta"),
        ("google", "Google"),
        ("ideogram", "Ideogram"),
        ("recraft-ai", "Recraft AI"),
        ("fofr", "Fofr"),
        ("zsxkib", "Zsxkib"),
        ("mcai", "MCAI"),
        ("chenxwh", "Chenxwh"),
        ("nvidia", "NVIDIA"),
        ("facebookresearch", "Facebook Research"),
        ("cerspense", "Cerspense"),
        ("cuuupid", "Cuuupid"),
        ("daanelson", "Daanelson"),
        ("lightricks", "Lightricks"),
        ("alibaba", "Alibaba"),
        ("rhymes-ai", "Rhymes AI"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn benchmarks() -> BTreeMap<String, Benchmark> {
    let mut table = BTreeMap::new();
    let mut add = |id: &str, bench: Benchmark| {
        table.insert(id.to_string(), bench);
    };

    add(
        "openai/gpt-4o",
        Benchmark {
            mmlu: Some(88.7),
            gpqa: Some(53.6),
            human_eval: Some(90.2),
            swe_bench: Some(38.4),
            live_code_bench: Some(43.5),
            math: Some(76.6),
            speed: Some(109.0),
            latency: Some(320.0),
            arena_elo: Some(1285.0),
        },
    );
    add(
        "openai/gpt-4o-mini",
        Benchmark {
            mmlu: Some(82.0),
            gpqa: Some(46.0),
            human_eval: Some(87.0),
            swe_bench: Some(28.3),
            live_code_bench: Some(35.2),
            speed: Some(141.0),
            latency: Some(280.0),
            arena_elo: Some(1273.0),
            ..Default::default()
        },
    );
    add(
        "openai/o1",
        Benchmark {
            mmlu: Some(91.8),
            gpqa: Some(78.0),
            human_eval: Some(92.4),
            swe_bench: Some(48.9),
            math: Some(94.8),
            speed: Some(35.0),
            latency: Some(2500.0),
            arena_elo: Some(1350.0),
            ..Default::default()
        },
    );
    add(
        "openai/o1-mini",
        Benchmark {
            mmlu: Some(85.2),
            gpqa: Some(60.0),
            human_eval: Some(88.0),
            swe_bench: Some(40.2),
            math: Some(90.0),
            speed: Some(65.0),
            latency: Some(1200.0),
            arena_elo: Some(1304.0),
            ..Default::default()
        },
    );
    add(
        "openai/o3-mini",
        Benchmark {
            gpqa: Some(79.7),
            human_eval: Some(92.6),
            swe_bench: Some(49.3),
            math: Some(97.0),
            speed: Some(150.0),
            latency: Some(800.0),
            arena_elo: Some(1330.0),
            ..Default::default()
        },
    );
    add(
        "anthropic/claude-3.5-sonnet",
        Benchmark {
            mmlu: Some(90.4),
            gpqa: Some(59.4),
            human_eval: Some(92.0),
            swe_bench: Some(49.0),
            live_code_bench: Some(45.2),
            math: Some(71.1),
            speed: Some(79.0),
            latency: Some(410.0),
            arena_elo: Some(1268.0),
        },
    );
    add(
        "anthropic/claude-3.5-haiku",
        Benchmark {
            mmlu: Some(84.0),
            gpqa: Some(51.0),
            human_eval: Some(88.0),
            swe_bench: Some(35.0),
            live_code_bench: Some(38.5),
            speed: Some(145.0),
            latency: Some(280.0),
            arena_elo: Some(1230.0),
            ..Default::default()
        },
    );
    add(
        "anthropic/claude-3-opus",
        Benchmark {
            mmlu: Some(86.8),
            gpqa: Some(50.4),
            human_eval: Some(84.9),
            swe_bench: Some(22.8),
            math: Some(60.1),
            speed: Some(24.0),
            latency: Some(680.0),
            arena_elo: Some(1248.0),
            ..Default::default()
        },
    );
    add(
        "anthropic/claude-3-haiku",
        Benchmark {
            mmlu: Some(75.2),
            gpqa: Some(33.0),
            human_eval: Some(75.9),
            swe_bench: Some(12.0),
            speed: Some(152.0),
            latency: Some(220.0),
            arena_elo: Some(1179.0),
            ..Default::default()
        },
    );
    add(
        "google/gemini-pro-1.5",
        Benchmark {
            mmlu: Some(85.9),
            gpqa: Some(46.2),
            human_eval: Some(71.9),
            swe_bench: Some(28.5),
            speed: Some(68.0),
            latency: Some(520.0),
            arena_elo: Some(1260.0),
            ..Default::default()
        },
    );
    add(
        "google/gemini-flash-1.5",
        Benchmark {
            mmlu: Some(78.9),
            gpqa: Some(39.0),
            human_eval: Some(74.3),
            swe_bench: Some(25.0),
            speed: Some(247.0),
            latency: Some(180.0),
            arena_elo: Some(1227.0),
            ..Default::default()
        },
    );
    add(
        "google/gemini-2.0-flash-exp",
        Benchmark {
            mmlu: Some(85.0),
            gpqa: Some(62.0),
            human_eval: Some(85.0),
            swe_bench: Some(42.0),
            live_code_bench: Some(45.0),
            speed: Some(320.0),
            latency: Some(150.0),
            arena_elo: Some(1290.0),
            ..Default::default()
        },
    );
    add(
        "meta-llama/llama-3.1-405b-instruct",
        Benchmark {
            mmlu: Some(88.6),
            gpqa: Some(50.7),
            human_eval: Some(89.0),
            swe_bench: Some(33.2),
            math: Some(73.8),
            speed: Some(32.0),
            latency: Some(580.0),
            arena_elo: Some(1251.0),
            ..Default::default()
        },
    );
    add(
        "meta-llama/llama-3.1-70b-instruct",
        Benchmark {
            mmlu: Some(86.0),
            gpqa: Some(46.7),
            human_eval: Some(80.5),
            swe_bench: Some(26.0),
            math: Some(68.0),
            speed: Some(85.0),
            latency: Some(320.0),
            arena_elo: Some(1227.0),
            ..Default::default()
        },
    );
    add(
        "meta-llama/llama-3.1-8b-instruct",
        Benchmark {
            mmlu: Some(69.4),
            gpqa: Some(32.8),
            human_eval: Some(72.6),
            swe_bench: Some(15.0),
            math: Some(51.9),
            speed: Some(195.0),
            latency: Some(180.0),
            arena_elo: Some(1152.0),
            ..Default::default()
        },
    );
    add(
        "meta-llama/llama-3.3-70b-instruct",
        Benchmark {
            mmlu: Some(86.3),
            gpqa: Some(49.0),
            human_eval: Some(88.4),
            swe_bench: Some(32.5),
            math: Some(77.0),
            speed: Some(90.0),
            latency: Some(300.0),
            arena_elo: Some(1256.0),
            ..Default::default()
        },
    );
    add(
        "mistralai/mistral-large",
        Benchmark {
            mmlu: Some(84.0),
            gpqa: Some(45.0),
            human_eval: Some(82.0),
            swe_bench: Some(28.0),
            speed: Some(55.0),
            latency: Some(380.0),
            arena_elo: Some(1235.0),
            ..Default::default()
        },
    );
    add(
        "mistralai/mixtral-8x7b-instruct",
        Benchmark {
            mmlu: Some(70.6),
            gpqa: Some(34.0),
            human_eval: Some(74.0),
            speed: Some(95.0),
            latency: Some(250.0),
            arena_elo: Some(1165.0),
            ..Default::default()
        },
    );
    add(
        "deepseek/deepseek-chat",
        Benchmark {
            mmlu: Some(87.5),
            gpqa: Some(58.5),
            human_eval: Some(90.0),
            swe_bench: Some(42.0),
            math: Some(84.6),
            speed: Some(65.0),
            latency: Some(350.0),
            arena_elo: Some(1275.0),
            ..Default::default()
        },
    );
    add(
        "deepseek/deepseek-r1",
        Benchmark {
            mmlu: Some(90.8),
            gpqa: Some(71.5),
            human_eval: Some(92.0),
            swe_bench: Some(49.2),
            live_code_bench: Some(55.0),
            math: Some(97.3),
            speed: Some(25.0),
            latency: Some(2000.0),
            arena_elo: Some(1365.0),
        },
    );
    add(
        "qwen/qwen-2.5-72b-instruct",
        Benchmark {
            mmlu: Some(85.3),
            gpqa: Some(49.0),
            human_eval: Some(86.0),
            swe_bench: Some(30.0),
            math: Some(83.1),
            speed: Some(45.0),
            latency: Some(400.0),
            arena_elo: Some(1245.0),
            ..Default::default()
        },
    );
    add(
        "qwen/qwen-2.5-coder-32b-instruct",
        Benchmark {
            human_eval: Some(92.7),
            swe_bench: Some(50.0),
            live_code_bench: Some(52.0),
            math: Some(83.0),
            speed: Some(85.0),
            latency: Some(260.0),
            arena_elo: Some(1268.0),
            ..Default::default()
        },
    );
    add(
        "cohere/command-r-plus",
        Benchmark {
            mmlu: Some(75.7),
            gpqa: Some(38.0),
            human_eval: Some(72.0),
            swe_bench: Some(18.0),
            speed: Some(55.0),
            latency: Some(380.0),
            arena_elo: Some(1185.0),
            ..Default::default()
        },
    );
    add(
        "x-ai/grok-2",
        Benchmark {
            mmlu: Some(87.5),
            gpqa: Some(56.0),
            human_eval: Some(88.0),
            swe_bench: Some(35.0),
            speed: Some(70.0),
            latency: Some(350.0),
            arena_elo: Some(1280.0),
            ..Default::default()
        },
    );

    table
}

fn image_meta() -> BTreeMap<String, ImageMeta> {
    let mut table = BTreeMap::new();
    let mut add = |id: &str, meta: ImageMeta| {
        table.insert(id.to_string(), meta);
    };

    add(
        "black-forest-labs/flux-schnell",
        ImageMeta {
            quality_score: Some(8.6),
            speed_score: Some(9.5),
            max_resolution: Some("1440x1440".into()),
            ..Default::default()
        },
    );
    add(
        "black-forest-labs/flux-1.1-pro",
        ImageMeta {
            quality_score: Some(9.4),
            speed_score: Some(8.0),
            max_resolution: Some("1440x1440".into()),
            ..Default::default()
        },
    );
    add(
        "stability-ai/sdxl",
        ImageMeta {
            quality_score: Some(8.2),
            speed_score: Some(7.5),
            max_resolution: Some("1024x1024".into()),
            styles: Some(vec!["photorealistic".into(), "artistic".into(), "anime".into()]),
            ..Default::default()
        },
    );
    add(
        "stability-ai/stable-diffusion-3.5-large",
        ImageMeta {
            quality_score: Some(9.0),
            speed_score: Some(7.0),
            max_resolution: Some("1536x1536".into()),
            ..Default::default()
        },
    );
    add(
        "recraft-ai/recraft-v3",
        ImageMeta {
            quality_score: Some(9.2),
            speed_score: Some(7.8),
            max_resolution: Some("2048x2048".into()),
            styles: Some(vec!["photorealistic".into(), "vector".into(), "artistic".into()]),
            ..Default::default()
        },
    );
    add(
        "ideogram-ai/ideogram-v2",
        ImageMeta {
            quality_score: Some(9.0),
            speed_score: Some(7.2),
            max_resolution: Some("2048x2048".into()),
            ..Default::default()
        },
    );
    add(
        "playgroundai/playground-v2.5-1024px-aesthetic",
        ImageMeta {
            quality_score: Some(8.4),
            speed_score: Some(7.6),
            max_resolution: Some("1024x1024".into()),
            ..Default::default()
        },
    );

    table
}

fn video_meta() -> BTreeMap<String, VideoMeta> {
    let mut table = BTreeMap::new();
    let mut add = |id: &str, meta: VideoMeta| {
        table.insert(id.to_string(), meta);
    };

    add(
        "tencent/hunyuan-video",
        VideoMeta {
            quality_score: Some(8.8),
            motion_score: Some(8.5),
            fps: Some(24),
            max_duration_secs: Some(5),
            resolutions: Some(vec!["720p".into()]),
        },
    );
    add(
        "genmo/mochi-1",
        VideoMeta {
            quality_score: Some(8.2),
            motion_score: Some(8.0),
            fps: Some(30),
            max_duration_secs: Some(5),
            resolutions: Some(vec!["480p".into()]),
        },
    );
    add(
        "lightricks/ltx-video",
        VideoMeta {
            quality_score: Some(7.8),
            motion_score: Some(7.5),
            fps: Some(25),
            max_duration_secs: Some(8),
            resolutions: Some(vec!["768x512".into()]),
        },
    );
    add(
        "minimax/video-01",
        VideoMeta {
            quality_score: Some(9.0),
            motion_score: Some(8.8),
            fps: Some(25),
            max_duration_secs: Some(6),
            resolutions: Some(vec!["720p".into(), "1080p".into()]),
        },
    );
    add(
        "luma/ray",
        VideoMeta {
            quality_score: Some(8.6),
            motion_score: Some(8.7),
            fps: Some(24),
            max_duration_secs: Some(10),
            resolutions: Some(vec!["720p".into(), "1080p".into()]),
        },
    );

    table
}

fn audio_meta() -> BTreeMap<String, AudioMeta> {
    let mut table = BTreeMap::new();
    let mut add = |id: &str, meta: AudioMeta| {
        table.insert(id.to_string(), meta);
    };

    add(
        "openai/whisper",
        AudioMeta {
            quality_score: Some(9.0),
            accuracy: Some(9.2),
            languages: Some(
                ["en", "ko", "ja", "zh", "es", "fr", "de", "it", "pt", "ru"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            ..Default::default()
        },
    );
    add(
        "vaibhavs10/incredibly-fast-whisper",
        AudioMeta {
            quality_score: Some(8.4),
            accuracy: Some(8.8),
            ..Default::default()
        },
    );
    add(
        "suno-ai/bark",
        AudioMeta {
            quality_score: Some(7.8),
            naturalness: Some(7.5),
            ..Default::default()
        },
    );
    add(
        "lucataco/xtts-v2",
        AudioMeta {
            quality_score: Some(8.2),
            naturalness: Some(8.4),
            languages: Some(
                ["en", "es", "fr", "de", "it", "pt", "zh", "ja", "ko"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            ..Default::default()
        },
    );
    add(
        "minimax/speech-01",
        AudioMeta {
            quality_score: Some(8.6),
            naturalness: Some(8.8),
            ..Default::default()
        },
    );

    table
}
