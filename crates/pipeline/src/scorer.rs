//! Track scoring against resolved feature directions.
//!
//! ## Normalization
//! Raw catalog values come in mixed units. Each is mapped onto [0, 1]:
//!
//! | feature  | normalized value                      |
//! |----------|---------------------------------------|
//! | loudness | clamp((raw + 45.92) / 46.672, 0, 1)   |
//! | tempo    | clamp(raw / 232.198, 0, 1)            |
//! | others   | clamp(raw, 0, 1)                      |
//!
//! Missing values normalize to 0.
//!
//! ## Score
//! `Σ relevance × n` over "high" directions plus `Σ relevance × (1 − n)`
//! over "low" directions, where `n` is the normalized value.

use data_loader::{Catalog, FeatureName, Polarity, Track};
use rayon::prelude::*;
use resolver::FeatureDirection;
use std::sync::Arc;
use tracing::{debug, warn};

/// Quietest loudness in the catalog, in dB
pub const LOUDNESS_OFFSET: f32 = 45.92;

/// Span of catalog loudness values, in dB
pub const LOUDNESS_RANGE: f32 = 46.672;

/// Fastest tempo in the catalog, in BPM
pub const TEMPO_MAX: f32 = 232.198;

/// Map a raw feature value onto [0, 1]
pub fn normalize(feature: FeatureName, raw: Option<f32>) -> f32 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let value = match feature {
        FeatureName::Loudness => (raw + LOUDNESS_OFFSET) / LOUDNESS_RANGE,
        FeatureName::Tempo => raw / TEMPO_MAX,
        _ => raw,
    };
    value.clamp(0.0, 1.0)
}

/// Weighted score of one track
pub fn score_track(track: &Track, directions: &[FeatureDirection]) -> f32 {
    directions
        .iter()
        .map(|direction| {
            let value = normalize(direction.feature, track.feature(direction.feature));
            match direction.polarity {
                Polarity::High => direction.relevance * value,
                Polarity::Low => direction.relevance * (1.0 - value),
            }
        })
        .sum()
}

/// A catalog track with its computed score.
#[derive(Debug, Clone)]
pub struct ScoredTrack {
    pub track: Arc<Track>,
    pub score: f32,
}

impl ScoredTrack {
    pub fn new(track: Arc<Track>, score: f32) -> Self {
        Self { track, score }
    }
}

/// Scores every catalog track in parallel.
///
/// ## Performance Note
/// Uses Rayon; output keeps catalog order so later stable sorts break
/// ties by catalog position.
#[derive(Clone)]
pub struct TrackScorer {
    catalog: Arc<Catalog>,
}

impl TrackScorer {
    /// Create a new TrackScorer.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Score all tracks, in catalog order
    pub fn score_all(&self, directions: &[FeatureDirection]) -> Vec<ScoredTrack> {
        for direction in directions {
            if !self.catalog.schema().has_feature(direction.feature) {
                warn!(
                    "Catalog has no {} column; every track scores it as 0",
                    direction.feature
                );
            }
        }

        let scored: Vec<ScoredTrack> = self
            .catalog
            .tracks()
            .par_iter()
            .map(|track| ScoredTrack::new(track.clone(), score_track(track, directions)))
            .collect();

        debug!("Scored {} tracks on {} directions", scored.len(), directions.len());
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::CatalogSchema;

    fn direction(feature: FeatureName, polarity: Polarity, relevance: f32) -> FeatureDirection {
        FeatureDirection {
            feature,
            polarity,
            relevance,
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_normalize_loudness_bounds() {
        assert_eq!(normalize(FeatureName::Loudness, Some(-45.92)), 0.0);
        // The loudest catalog track sits just under the top of the range
        let loudest = normalize(FeatureName::Loudness, Some(0.744));
        assert!(approx(loudest, (0.744 + 45.92) / 46.672));
        assert!((loudest - 1.0).abs() < 1e-3);
        assert_eq!(normalize(FeatureName::Loudness, Some(-60.0)), 0.0);
        assert_eq!(normalize(FeatureName::Loudness, Some(3.0)), 1.0);
    }

    #[test]
    fn test_normalize_tempo_bounds() {
        assert_eq!(normalize(FeatureName::Tempo, Some(0.0)), 0.0);
        assert!(approx(normalize(FeatureName::Tempo, Some(232.198)), 1.0));
        assert!(approx(normalize(FeatureName::Tempo, Some(116.099)), 0.5));
    }

    #[test]
    fn test_normalize_other_features_clamp() {
        assert_eq!(normalize(FeatureName::Energy, Some(0.3)), 0.3);
        assert_eq!(normalize(FeatureName::Valence, Some(1.7)), 1.0);
        assert_eq!(normalize(FeatureName::Speechiness, Some(-0.2)), 0.0);
    }

    #[test]
    fn test_normalize_null_is_zero() {
        for feature in FeatureName::ALL {
            assert_eq!(normalize(feature, None), 0.0);
        }
    }

    #[test]
    fn test_score_track_weights_directions() {
        let track = Track::new("Song", "Artist")
            .with_feature(FeatureName::Energy, 0.2)
            .with_feature(FeatureName::Acousticness, 0.9);

        let directions = [
            direction(FeatureName::Energy, Polarity::Low, 0.5),
            direction(FeatureName::Acousticness, Polarity::High, 0.4),
        ];

        // 0.5 * (1 - 0.2) + 0.4 * 0.9
        assert!(approx(score_track(&track, &directions), 0.76));
        assert_eq!(score_track(&track, &[]), 0.0);
    }

    #[test]
    fn test_score_monotonic_in_normalized_value() {
        let high = [direction(FeatureName::Danceability, Polarity::High, 0.6)];
        let low = [direction(FeatureName::Danceability, Polarity::Low, 0.6)];

        let mut previous_high = f32::NEG_INFINITY;
        let mut previous_low = f32::INFINITY;
        for step in 0..=10 {
            let track = Track::new("T", "A").with_feature(FeatureName::Danceability, step as f32 / 10.0);

            let high_score = score_track(&track, &high);
            let low_score = score_track(&track, &low);
            assert!(high_score >= previous_high);
            assert!(low_score <= previous_low);
            previous_high = high_score;
            previous_low = low_score;
        }
    }

    #[test]
    fn test_missing_value_scores_as_zero_normalized() {
        let track = Track::new("Song", "Artist");

        let high = [direction(FeatureName::Liveness, Polarity::High, 0.7)];
        let low = [direction(FeatureName::Liveness, Polarity::Low, 0.7)];

        assert_eq!(score_track(&track, &high), 0.0);
        assert!(approx(score_track(&track, &low), 0.7));
    }

    #[test]
    fn test_score_all_preserves_catalog_order() {
        let mut catalog = Catalog::new(CatalogSchema::full());
        for (i, energy) in [0.9, 0.1, 0.5].into_iter().enumerate() {
            catalog.insert_track(
                Track::new(format!("Track {}", i), "Artist").with_feature(FeatureName::Energy, energy),
            );
        }

        let scorer = TrackScorer::new(Arc::new(catalog));
        let scored = scorer.score_all(&[direction(FeatureName::Energy, Polarity::High, 1.0)]);

        let titles: Vec<_> = scored.iter().map(|s| s.track.title.as_str()).collect();
        assert_eq!(titles, vec!["Track 0", "Track 1", "Track 2"]);
        assert!(approx(scored[0].score, 0.9));
        assert!(approx(scored[1].score, 0.1));
    }
}
