//! Types produced by direction resolution.

use data_loader::{FeatureName, Polarity};
use std::collections::BTreeMap;

/// A query embedding, checked non-empty and of the corpus dimension.
///
/// Request-scoped; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEmbedding {
    pub vector: Vec<f32>,
}

impl QueryEmbedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// How close a query sits to each end of one feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSimilarity {
    /// Mean of the top-n similarities against the "high" exemplars
    pub high: f32,
    /// Mean of the top-n similarities against the "low" exemplars
    pub low: f32,
}

impl FeatureSimilarity {
    /// The dominant polarity and its similarity.
    ///
    /// "high" must be strictly larger to win; a tie resolves to "low".
    pub fn dominant(&self) -> (Polarity, f32) {
        if self.high > self.low {
            (Polarity::High, self.high)
        } else {
            (Polarity::Low, self.low)
        }
    }
}

/// Per-feature similarities. Iterates in canonical feature order.
pub type FeatureSimilarityMap = BTreeMap<FeatureName, FeatureSimilarity>;

/// One feature direction that drives scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDirection {
    pub feature: FeatureName,
    pub polarity: Polarity,
    /// Similarity of the dominant polarity, used as the scoring weight
    pub relevance: f32,
}

/// An exemplar sentence and how similar it is to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ExemplarMatch {
    pub feature: FeatureName,
    pub polarity: Polarity,
    pub text: String,
    pub similarity: f32,
}

/// Why a direction was picked: the exemplars that pulled the query there
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureExplanation {
    pub direction: FeatureDirection,
    pub examples: Vec<ExemplarMatch>,
}
