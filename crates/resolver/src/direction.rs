//! Feature Direction Resolver
//!
//! Maps a free-text query onto the acoustic feature dimensions:
//! "Which features does this query talk about, and which end of each?"
//!
//! ## Algorithm
//! 1. Embed the query once through the injected provider
//! 2. For each feature with both high and low exemplars:
//!    - Cosine similarity of the query against every exemplar of each polarity
//!    - Average the top-n similarities per polarity (damps weak exemplars)
//! 3. Dominant polarity per feature = the larger average; that is its relevance
//! 4. Stable-sort features by relevance, keep the first `limit`

use crate::similarity::{cosine_similarity, top_n_mean};
use crate::types::{FeatureDirection, FeatureSimilarity, FeatureSimilarityMap, QueryEmbedding};
use data_loader::{ExemplarCorpus, FeatureName, Polarity};
use embedding_client::{EmbeddingError, EmbeddingProvider};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Exemplars averaged per polarity
pub const DEFAULT_TOP_N: usize = 5;

/// Directions that drive scoring
pub const DEFAULT_DIRECTION_LIMIT: usize = 3;

/// Resolves queries against a shared, read-only exemplar corpus
#[derive(Debug, Clone)]
pub struct FeatureDirectionResolver {
    /// Shared reference to the corpus (read-only, so no Mutex needed)
    corpus: Arc<ExemplarCorpus>,

    /// How many of the best exemplar similarities to average per polarity
    top_n: usize,
}

impl FeatureDirectionResolver {
    /// Create a new resolver
    pub fn new(corpus: Arc<ExemplarCorpus>) -> Self {
        Self {
            corpus,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Configure how many exemplars are averaged per polarity (default: 5)
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn corpus(&self) -> &ExemplarCorpus {
        &self.corpus
    }

    /// Embed the query and check it against the corpus dimension.
    ///
    /// Fails rather than fabricating a vector when the provider errors or
    /// returns nothing.
    pub async fn embed_query(
        &self,
        query: &str,
        provider: &dyn EmbeddingProvider,
    ) -> Result<QueryEmbedding, EmbeddingError> {
        let vector = provider.embed(query).await?;
        if vector.is_empty() {
            return Err(EmbeddingError::EmptyEmbedding);
        }
        self.check_dimension(&vector)?;
        Ok(QueryEmbedding::new(vector))
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), EmbeddingError> {
        match self.corpus.dimension() {
            Some(expected) if expected != vector.len() => Err(EmbeddingError::DimensionMismatch {
                expected,
                found: vector.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Embed `query` and compute (sim_high, sim_low) for every resolvable feature
    #[instrument(skip(self, provider), fields(provider = provider.name()))]
    pub async fn resolve(
        &self,
        query: &str,
        provider: &dyn EmbeddingProvider,
    ) -> Result<FeatureSimilarityMap, EmbeddingError> {
        let embedding = self.embed_query(query, provider).await?;
        Ok(self.similarities(&embedding))
    }

    /// Compute (sim_high, sim_low) for every resolvable feature.
    ///
    /// Features missing either polarity set are left out of the map.
    pub fn similarities(&self, query: &QueryEmbedding) -> FeatureSimilarityMap {
        let similarities: FeatureSimilarityMap = FeatureName::ALL
            .par_iter()
            .filter_map(|&feature| {
                let high = self.polarity_similarity(query, feature, Polarity::High);
                let low = self.polarity_similarity(query, feature, Polarity::Low);
                match (high, low) {
                    (Some(high), Some(low)) => Some((feature, FeatureSimilarity { high, low })),
                    _ => {
                        debug!("Skipping feature {}: missing exemplar data", feature);
                        None
                    }
                }
            })
            .collect();

        for (feature, sim) in &similarities {
            debug!("{}: sim_high={:.4}, sim_low={:.4}", feature, sim.high, sim.low);
        }
        similarities
    }

    /// Top-n mean similarity against one polarity set, `None` if the set is empty
    fn polarity_similarity(
        &self,
        query: &QueryEmbedding,
        feature: FeatureName,
        polarity: Polarity,
    ) -> Option<f32> {
        let sims: Vec<f32> = self
            .corpus
            .exemplars(feature, polarity)
            .iter()
            .map(|exemplar| cosine_similarity(&query.vector, &exemplar.embedding))
            .collect();
        top_n_mean(sims, self.top_n)
    }
}

/// Pick the dominant polarity of each feature and keep the `limit` most relevant.
///
/// The sort is stable, so equal relevances keep canonical feature order.
pub fn select_dominant(similarities: &FeatureSimilarityMap, limit: usize) -> Vec<FeatureDirection> {
    let mut directions: Vec<FeatureDirection> = similarities
        .iter()
        .map(|(&feature, sim)| {
            let (polarity, relevance) = sim.dominant();
            FeatureDirection {
                feature,
                polarity,
                relevance,
            }
        })
        .collect();

    directions.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    directions.truncate(limit);

    for direction in &directions {
        debug!(
            "Selected {}: {} (relevance={:.4})",
            direction.feature, direction.polarity, direction.relevance
        );
    }
    directions
}
