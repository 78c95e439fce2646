//! Filter implementations for the selection pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod dedup;
pub mod language;
pub mod popularity;
pub mod rank_window;

// Re-export for convenience
pub use dedup::{ArtistDedupFilter, TitleDedupFilter};
pub use language::LanguageFilter;
pub use popularity::MinimumPopularityFilter;
pub use rank_window::RankWindowFilter;
