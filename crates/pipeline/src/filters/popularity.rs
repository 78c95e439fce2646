//! Filter to enforce a popularity floor.

use crate::scorer::ScoredTrack;
use crate::traits::Filter;

/// Removes tracks below a minimum popularity.
///
/// A track with no popularity value is removed.
pub struct MinimumPopularityFilter {
    min_popularity: f32,
}

impl MinimumPopularityFilter {
    /// Create a new MinimumPopularityFilter (typically 20).
    pub fn new(min_popularity: f32) -> Self {
        Self { min_popularity }
    }
}

impl Filter for MinimumPopularityFilter {
    fn name(&self) -> &str {
        "MinimumPopularityFilter"
    }

    fn apply(&self, tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
        tracks
            .into_iter()
            .filter(|scored| {
                scored
                    .track
                    .popularity
                    .is_some_and(|popularity| popularity >= self.min_popularity)
            })
            .collect()
    }
}
