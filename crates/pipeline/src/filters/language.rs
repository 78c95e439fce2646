//! Filter to keep only tracks in the allowed languages.

use crate::scorer::ScoredTrack;
use crate::traits::Filter;

/// Keeps tracks whose language is one of the allowed values.
///
/// Matching is exact. A track with no language never passes, so this
/// filter belongs in the pipeline only when the catalog has the column.
pub struct LanguageFilter {
    allowed: Vec<String>,
}

impl LanguageFilter {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }
}

impl Filter for LanguageFilter {
    fn name(&self) -> &str {
        "LanguageFilter"
    }

    fn apply(&self, tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
        tracks
            .into_iter()
            .filter(|scored| match &scored.track.language {
                Some(language) => self.allowed.iter().any(|allowed| allowed == language),
                None => false,
            })
            .collect()
    }
}
