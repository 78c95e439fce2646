//! Exemplar lookups that explain a resolution.
//!
//! Nothing here feeds into scoring. These are the "why" views printed by the
//! CLI and returned alongside recommendations when asked for.

use crate::direction::FeatureDirectionResolver;
use crate::similarity::cosine_similarity;
use crate::types::{ExemplarMatch, FeatureDirection, FeatureExplanation, QueryEmbedding};
use data_loader::{ExemplarSentence, FeatureName, Polarity};
use rayon::prelude::*;

impl FeatureDirectionResolver {
    /// The `k` exemplars closest to the query across the whole corpus
    pub fn nearest_exemplars(&self, query: &QueryEmbedding, k: usize) -> Vec<ExemplarMatch> {
        let exemplars: Vec<&ExemplarSentence> = self.corpus().iter().collect();
        let mut matches: Vec<ExemplarMatch> = exemplars
            .par_iter()
            .map(|exemplar| to_match(query, exemplar))
            .collect();

        sort_matches(&mut matches);
        matches.truncate(k);
        matches
    }

    /// For each direction, the `per_direction` exemplars of that polarity
    /// closest to the query
    pub fn explain(
        &self,
        query: &QueryEmbedding,
        directions: &[FeatureDirection],
        per_direction: usize,
    ) -> Vec<FeatureExplanation> {
        directions
            .iter()
            .map(|&direction| FeatureExplanation {
                direction,
                examples: self.closest_in_set(
                    query,
                    direction.feature,
                    direction.polarity,
                    per_direction,
                ),
            })
            .collect()
    }

    fn closest_in_set(
        &self,
        query: &QueryEmbedding,
        feature: FeatureName,
        polarity: Polarity,
        k: usize,
    ) -> Vec<ExemplarMatch> {
        let mut matches: Vec<ExemplarMatch> = self
            .corpus()
            .exemplars(feature, polarity)
            .iter()
            .map(|exemplar| to_match(query, exemplar))
            .collect();

        sort_matches(&mut matches);
        matches.truncate(k);
        matches
    }
}

fn to_match(query: &QueryEmbedding, exemplar: &ExemplarSentence) -> ExemplarMatch {
    ExemplarMatch {
        feature: exemplar.feature,
        polarity: exemplar.polarity,
        text: exemplar.text.clone(),
        similarity: cosine_similarity(&query.vector, &exemplar.embedding),
    }
}

// Stable: equal similarities keep corpus order
fn sort_matches(matches: &mut [ExemplarMatch]) {
    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
}
