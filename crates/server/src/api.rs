//! Request and response types of the recommendation entry point.
//!
//! Field names are the wire names; do not rename them.

use data_loader::{FeatureName, Polarity};
use pipeline::ScoredTrack;
use resolver::{ExemplarMatch, FeatureExplanation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    /// Defaults to the configured top-k (20) when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
}

impl RecommendRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// One ranked track. Lists of these are in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub track_name: String,
    pub artist_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_uri: Option<String>,
    pub recommend_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f32>,
}

impl From<&ScoredTrack> for TrackInfo {
    fn from(scored: &ScoredTrack) -> Self {
        let track = &scored.track;
        Self {
            track_name: track.title.clone(),
            artist_name: track.artist.clone(),
            track_uri: track.uri.clone(),
            recommend_score: scored.score,
            language: track.language.clone(),
            popularity: track.popularity,
        }
    }
}

/// An exemplar sentence close to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemplarInfo {
    pub feature: FeatureName,
    pub polarity: Polarity,
    pub sentence: String,
    pub similarity: f32,
}

impl From<&ExemplarMatch> for ExemplarInfo {
    fn from(m: &ExemplarMatch) -> Self {
        Self {
            feature: m.feature,
            polarity: m.polarity,
            sentence: m.text.clone(),
            similarity: m.similarity,
        }
    }
}

/// A scoring direction and the exemplars behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionInfo {
    pub feature: FeatureName,
    pub polarity: Polarity,
    pub relevance: f32,
    pub examples: Vec<ExemplarInfo>,
}

impl From<&FeatureExplanation> for DirectionInfo {
    fn from(explanation: &FeatureExplanation) -> Self {
        Self {
            feature: explanation.direction.feature,
            polarity: explanation.direction.polarity,
            relevance: explanation.direction.relevance,
            examples: explanation.examples.iter().map(ExemplarInfo::from).collect(),
        }
    }
}

/// Recommendations together with the directions that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainedRecommendations {
    pub directions: Vec<DirectionInfo>,
    pub tracks: Vec<TrackInfo>,
}
