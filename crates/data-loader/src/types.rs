//! Core domain types for the exemplar corpus and the track catalog.
//!
//! This module defines the fundamental data structures used throughout the system.
//! Key Rust concepts demonstrated here:
//! - Enums for closed sets of values (FeatureName, Polarity)
//! - BTreeMap for deterministic iteration order
//! - Arc for sharing read-only rows across threads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// Feature Types
// =============================================================================

/// The nine acoustic descriptors every track is characterized by.
///
/// Declaration order is the canonical iteration order. `Ord` is derived,
/// so a `BTreeMap<FeatureName, _>` iterates in exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureName {
    Danceability,
    Energy,
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    Valence,
    Tempo,
}

impl FeatureName {
    /// Number of features
    pub const COUNT: usize = 9;

    /// All features in canonical order
    pub const ALL: [FeatureName; Self::COUNT] = [
        FeatureName::Danceability,
        FeatureName::Energy,
        FeatureName::Loudness,
        FeatureName::Speechiness,
        FeatureName::Acousticness,
        FeatureName::Instrumentalness,
        FeatureName::Liveness,
        FeatureName::Valence,
        FeatureName::Tempo,
    ];

    /// Column / key name used in the catalog and the corpus files
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureName::Danceability => "danceability",
            FeatureName::Energy => "energy",
            FeatureName::Loudness => "loudness",
            FeatureName::Speechiness => "speechiness",
            FeatureName::Acousticness => "acousticness",
            FeatureName::Instrumentalness => "instrumentalness",
            FeatureName::Liveness => "liveness",
            FeatureName::Valence => "valence",
            FeatureName::Tempo => "tempo",
        }
    }

    /// Position in `ALL`, used to index per-track feature arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureName::ALL
            .into_iter()
            .find(|feature| feature.as_str() == s)
            .ok_or_else(|| format!("unknown feature: {}", s))
    }
}

/// Which end of a feature's range an exemplar set (or a direction) describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    High,
    Low,
}

impl Polarity {
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::High => "high",
            Polarity::Low => "low",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Polarity::High),
            "low" => Ok(Polarity::Low),
            _ => Err(format!("unknown polarity: {}", s)),
        }
    }
}

/// Build the corpus key for a feature/polarity pair, e.g. `"energy_high"`
pub fn corpus_key(feature: FeatureName, polarity: Polarity) -> String {
    format!("{}_{}", feature, polarity)
}

/// Split a corpus key back into its feature and polarity.
///
/// Returns `None` for keys outside the `"{feature}_{high|low}"` scheme.
pub fn parse_corpus_key(key: &str) -> Option<(FeatureName, Polarity)> {
    let (feature, polarity) = key.rsplit_once('_')?;
    Some((feature.parse().ok()?, polarity.parse().ok()?))
}

// =============================================================================
// Exemplar Corpus
// =============================================================================

/// One curated sentence typifying the high or low end of a feature,
/// together with its precomputed embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExemplarSentence {
    pub feature: FeatureName,
    pub polarity: Polarity,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Exemplar count per corpus key, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemplarSetStats {
    pub feature: FeatureName,
    pub polarity: Polarity,
    pub count: usize,
}

/// The immutable set of exemplar sentences, grouped by (feature, polarity).
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct ExemplarCorpus {
    pub(crate) sets: BTreeMap<(FeatureName, Polarity), Vec<ExemplarSentence>>,
    /// Shared embedding dimension D, `None` while the corpus is empty
    pub(crate) dimension: Option<usize>,
}

impl ExemplarCorpus {
    /// Creates a new, empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Exemplars for one polarity of a feature; empty if the set is absent
    pub fn exemplars(&self, feature: FeatureName, polarity: Polarity) -> &[ExemplarSentence] {
        self.sets
            .get(&(feature, polarity))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// True when both polarity sets of `feature` hold at least one exemplar
    pub fn is_resolvable(&self, feature: FeatureName) -> bool {
        !self.exemplars(feature, Polarity::High).is_empty()
            && !self.exemplars(feature, Polarity::Low).is_empty()
    }

    /// Features with both polarity sets present, in canonical order
    pub fn resolvable_features(&self) -> Vec<FeatureName> {
        FeatureName::ALL
            .into_iter()
            .filter(|&feature| self.is_resolvable(feature))
            .collect()
    }

    /// Embedding dimension shared by every exemplar
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Iterate over every exemplar in (feature, polarity, file) order
    pub fn iter(&self) -> impl Iterator<Item = &ExemplarSentence> {
        self.sets.values().flatten()
    }

    /// Total number of exemplar sentences
    pub fn len(&self) -> usize {
        self.sets.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-key exemplar counts in canonical order
    pub fn stats(&self) -> Vec<ExemplarSetStats> {
        self.sets
            .iter()
            .map(|(&(feature, polarity), exemplars)| ExemplarSetStats {
                feature,
                polarity,
                count: exemplars.len(),
            })
            .collect()
    }
}

// =============================================================================
// Track Catalog
// =============================================================================

/// A read-only catalog row.
///
/// Feature values are raw (loudness in dB, tempo in BPM, the rest in [0, 1])
/// and `None` when the cell was empty or unparsable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub uri: Option<String>,
    pub language: Option<String>,
    pub popularity: Option<f32>,
    pub features: [Option<f32>; FeatureName::COUNT],
}

impl Track {
    /// Creates a track with no feature values
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            uri: None,
            language: None,
            popularity: None,
            features: [None; FeatureName::COUNT],
        }
    }

    /// Raw value of one feature
    pub fn feature(&self, feature: FeatureName) -> Option<f32> {
        self.features[feature.index()]
    }

    /// Builder-style setter, mostly for tests and fixtures
    pub fn with_feature(mut self, feature: FeatureName, value: f32) -> Self {
        self.features[feature.index()] = Some(value);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_popularity(mut self, popularity: f32) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// Which optional columns the loaded catalog actually has.
///
/// Filters that depend on a column are enabled only when it is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSchema {
    pub has_language: bool,
    pub has_popularity: bool,
    pub has_uri: bool,
    pub feature_columns: Vec<FeatureName>,
}

impl CatalogSchema {
    /// Schema with every optional column present
    pub fn full() -> Self {
        Self {
            has_language: true,
            has_popularity: true,
            has_uri: true,
            feature_columns: FeatureName::ALL.to_vec(),
        }
    }

    /// Schema with no optional columns
    pub fn bare() -> Self {
        Self {
            has_language: false,
            has_popularity: false,
            has_uri: false,
            feature_columns: FeatureName::ALL.to_vec(),
        }
    }

    pub fn has_feature(&self, feature: FeatureName) -> bool {
        self.feature_columns.contains(&feature)
    }
}

/// The in-memory track catalog
#[derive(Debug)]
pub struct Catalog {
    pub(crate) tracks: Vec<Arc<Track>>,
    pub(crate) schema: CatalogSchema,
    /// Numeric cells that failed to parse and were treated as null
    pub(crate) malformed_values: usize,
}

impl Catalog {
    /// Creates an empty catalog with the given schema
    pub fn new(schema: CatalogSchema) -> Self {
        Self {
            tracks: Vec::new(),
            schema,
            malformed_values: 0,
        }
    }

    /// Append a row, preserving file order
    pub fn insert_track(&mut self, track: Track) {
        self.tracks.push(Arc::new(track));
    }

    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    pub fn malformed_values(&self) -> usize {
        self.malformed_values
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
