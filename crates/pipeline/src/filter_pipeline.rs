//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::scorer::ScoredTrack;
use crate::traits::Filter;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(LanguageFilter::new(vec!["English".into(), "Korean".into()]))
///     .add_filter(MinimumPopularityFilter::new(20.0))
///     .add_filter(RankWindowFilter::new(500));
///
/// let filtered = pipeline.apply(scored);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the tracks.
    ///
    /// ## Algorithm
    /// 1. Start with the input tracks
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    pub fn apply(&self, tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
        let mut current = tracks;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ArtistDedupFilter, MinimumPopularityFilter};
    use data_loader::Track;
    use std::sync::Arc;

    fn scored(title: &str, artist: &str, popularity: f32, score: f32) -> ScoredTrack {
        ScoredTrack::new(
            Arc::new(Track::new(title, artist).with_popularity(popularity)),
            score,
        )
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();

        let tracks = vec![scored("A", "X", 50.0, 0.9), scored("B", "Y", 10.0, 0.8)];

        let filtered = pipeline.apply(tracks);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filters_run_in_order() {
        let pipeline = FilterPipeline::new()
            .add_filter(MinimumPopularityFilter::new(20.0))
            .add_filter(ArtistDedupFilter);

        assert_eq!(
            pipeline.filter_names(),
            vec!["MinimumPopularityFilter", "ArtistDedupFilter"]
        );

        // "A" would win the artist dedup, but the popularity filter drops it first
        let tracks = vec![
            scored("A", "X", 5.0, 0.9),
            scored("B", "X", 50.0, 0.8),
            scored("C", "Y", 50.0, 0.7),
        ];

        let filtered = pipeline.apply(tracks);
        let titles: Vec<_> = filtered.iter().map(|s| s.track.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }
}
