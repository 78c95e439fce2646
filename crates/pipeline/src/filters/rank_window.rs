//! Ranks tracks by score and bounds the candidate set.

use crate::scorer::ScoredTrack;
use crate::traits::Filter;

/// Stable-sorts by descending score and keeps the first `window` tracks.
///
/// Tracks outside the window are never reconsidered by later filters.
pub struct RankWindowFilter {
    window: usize,
}

impl RankWindowFilter {
    /// Create a new RankWindowFilter (typically 500).
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Filter for RankWindowFilter {
    fn name(&self) -> &str {
        "RankWindowFilter"
    }

    fn apply(&self, mut tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
        tracks.sort_by(|a, b| b.score.total_cmp(&a.score));
        tracks.truncate(self.window);
        tracks
    }
}
