//! Scoring and selection of catalog tracks.
//!
//! This crate provides:
//! - Feature normalization and the `TrackScorer`
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - `TopKSelector`, the fixed filter/sort/dedup sequence that produces results
//!
//! ## Architecture
//! Tracks flow through the pipeline in stages:
//! 1. The scorer gives every catalog track a weighted score from the resolved directions
//! 2. Filters drop tracks outside the allowed languages or below the popularity floor
//! 3. Survivors are ranked and cut to a candidate window
//! 4. Title then artist duplicates are removed and the first k are returned
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{SelectionConfig, TopKSelector, TrackScorer};
//!
//! let scorer = TrackScorer::new(catalog.clone());
//! let scored = scorer.score_all(&directions);
//!
//! let selector = TopKSelector::new(SelectionConfig::from_schema(catalog.schema()));
//! let top = selector.select_top_k(scored, 20);
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod scorer;
pub mod selection;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use scorer::{normalize, score_track, ScoredTrack, TrackScorer};
pub use selection::{SelectionConfig, TopKSelector};
