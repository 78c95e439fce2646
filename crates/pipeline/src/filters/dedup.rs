//! Duplicate removal by title and by artist.
//!
//! Both filters keep the first occurrence, so they must run after ranking
//! for "first" to mean "best scored".

use crate::scorer::ScoredTrack;
use crate::traits::Filter;
use std::collections::HashSet;

fn dedup_by<F>(tracks: Vec<ScoredTrack>, key: F) -> Vec<ScoredTrack>
where
    F: Fn(&ScoredTrack) -> &str,
{
    let mut seen: HashSet<String> = HashSet::new();
    tracks
        .into_iter()
        .filter(|scored| seen.insert(key(scored).to_string()))
        .collect()
}

/// Keeps the first track of each title
pub struct TitleDedupFilter;

impl Filter for TitleDedupFilter {
    fn name(&self) -> &str {
        "TitleDedupFilter"
    }

    fn apply(&self, tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
        dedup_by(tracks, |scored| scored.track.title.as_str())
    }
}

/// Keeps the first track of each artist
pub struct ArtistDedupFilter;

impl Filter for ArtistDedupFilter {
    fn name(&self) -> &str {
        "ArtistDedupFilter"
    }

    fn apply(&self, tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack> {
        dedup_by(tracks, |scored| scored.track.artist.as_str())
    }
}
