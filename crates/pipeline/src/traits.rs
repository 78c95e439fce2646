//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored tracks.

use crate::scorer::ScoredTrack;

/// Core trait for filtering scored tracks.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across request threads
/// - Filters take ownership of the Vec<ScoredTrack> and return a filtered Vec
/// - Filters cannot fail: a track either passes or it doesn't
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of tracks.
    ///
    /// Order of the surviving tracks must be preserved unless reordering
    /// is the filter's job.
    fn apply(&self, tracks: Vec<ScoredTrack>) -> Vec<ScoredTrack>;
}
