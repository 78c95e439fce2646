//! Benchmarks for scoring and selection
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog roughly the size of the real one (~60k tracks).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, CatalogSchema, FeatureName, Polarity, Track};
use pipeline::{SelectionConfig, TopKSelector, TrackScorer};
use resolver::FeatureDirection;
use std::sync::Arc;

const CATALOG_SIZE: usize = 60_000;
const LANGUAGES: [&str; 4] = ["English", "Korean", "Japanese", "Spanish"];

fn build_catalog() -> Arc<Catalog> {
    let mut catalog = Catalog::new(CatalogSchema::full());
    for i in 0..CATALOG_SIZE {
        // Cheap deterministic spread over [0, 1)
        let x = |salt: usize| ((i * 7919 + salt * 104_729) % 1000) as f32 / 1000.0;

        let mut track = Track::new(format!("Track {}", i % 45_000), format!("Artist {}", i % 9_000))
            .with_language(LANGUAGES[i % LANGUAGES.len()])
            .with_popularity(x(99) * 100.0);
        for (salt, feature) in FeatureName::ALL.into_iter().enumerate() {
            let raw = match feature {
                FeatureName::Loudness => x(salt) * 46.672 - 45.92,
                FeatureName::Tempo => x(salt) * 232.198,
                _ => x(salt),
            };
            track = track.with_feature(feature, raw);
        }
        catalog.insert_track(track);
    }
    Arc::new(catalog)
}

fn directions() -> Vec<FeatureDirection> {
    vec![
        FeatureDirection {
            feature: FeatureName::Energy,
            polarity: Polarity::Low,
            relevance: 0.6,
        },
        FeatureDirection {
            feature: FeatureName::Acousticness,
            polarity: Polarity::High,
            relevance: 0.55,
        },
        FeatureDirection {
            feature: FeatureName::Tempo,
            polarity: Polarity::Low,
            relevance: 0.5,
        },
    ]
}

fn bench_score_all(c: &mut Criterion) {
    let scorer = TrackScorer::new(build_catalog());
    let directions = directions();

    c.bench_function("score_all", |b| {
        b.iter(|| {
            let scored = scorer.score_all(black_box(&directions));
            black_box(scored)
        })
    });
}

fn bench_select_top_k(c: &mut Criterion) {
    let catalog = build_catalog();
    let scored = TrackScorer::new(catalog.clone()).score_all(&directions());
    let selector = TopKSelector::new(SelectionConfig::from_schema(catalog.schema()));

    c.bench_function("select_top_k", |b| {
        b.iter(|| {
            let top = selector.select_top_k(black_box(scored.clone()), black_box(20));
            black_box(top)
        })
    });
}

criterion_group!(benches, bench_score_all, bench_select_top_k);
criterion_main!(benches);
