//! # Resolver Crate
//!
//! Turns a free-text mood query into feature directions: which acoustic
//! features the query talks about, which end of each, and how strongly.
//!
//! ## Main Components
//!
//! - **similarity**: Cosine similarity and top-n averaging
//! - **direction**: `FeatureDirectionResolver` and dominant-direction selection
//! - **explain**: Nearest exemplars, overall and per direction
//! - **types**: Query embeddings, similarity maps, directions
//!
//! ## Example Usage
//!
//! ```ignore
//! use resolver::{select_dominant, FeatureDirectionResolver, DEFAULT_DIRECTION_LIMIT};
//!
//! let resolver = FeatureDirectionResolver::new(corpus.clone());
//! let similarities = resolver.resolve("rainy afternoon in a cafe", &provider).await?;
//! for direction in select_dominant(&similarities, DEFAULT_DIRECTION_LIMIT) {
//!     println!("{} {} ({:.3})", direction.feature, direction.polarity, direction.relevance);
//! }
//! ```
//!
//! The corpus is shared through `Arc` and only read, so one resolver can be
//! cloned into every request.

pub mod direction;
pub mod explain;
pub mod similarity;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use direction::{
    select_dominant, FeatureDirectionResolver, DEFAULT_DIRECTION_LIMIT, DEFAULT_TOP_N,
};
pub use similarity::{cosine_similarity, top_n_mean};
pub use types::{
    ExemplarMatch, FeatureDirection, FeatureExplanation, FeatureSimilarity, FeatureSimilarityMap,
    QueryEmbedding,
};
