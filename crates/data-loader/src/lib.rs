//! # Data Loader Crate
//!
//! This crate loads the two read-only data sets the recommender works from:
//! the exemplar corpus (feature sentences + precomputed embeddings) and the
//! track catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (FeatureName, Polarity, ExemplarCorpus, Track, Catalog)
//! - **parser**: Parse the JSON corpus files and the catalog CSV
//! - **corpus**: Assemble and validate the ExemplarCorpus
//! - **catalog**: Load the Catalog and report its schema
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, ExemplarCorpus, FeatureName, Polarity};
//! use std::path::Path;
//!
//! let corpus = ExemplarCorpus::load_from_files(
//!     Path::new("data/example_sentences.json"),
//!     Path::new("data/feature_embeddings.json"),
//! )?;
//! let catalog = Catalog::load_from_file(Path::new("data/spotify_tracknames_updated.csv"))?;
//!
//! let calm = corpus.exemplars(FeatureName::Energy, Polarity::Low);
//! println!("{} low-energy exemplars, {} tracks", calm.len(), catalog.len());
//! ```
//!
//! Both structures are built once and never mutated afterwards, so they can
//! be wrapped in `Arc` and read from any number of threads.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod corpus;
pub mod catalog;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::{EmbeddingsByKey, SentencesByKey};
pub use types::{
    // Corpus
    ExemplarCorpus,
    ExemplarSentence,
    ExemplarSetStats,
    FeatureName,
    Polarity,
    corpus_key,
    parse_corpus_key,
    // Catalog
    Catalog,
    CatalogSchema,
    Track,
};
