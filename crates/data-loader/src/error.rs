//! Error types for the data-loader crate.
//!
//! Every variant means the same thing to callers: the exemplar corpus or
//! the track catalog is unavailable, and the request cannot be served.

use thiserror::Error;

/// Errors that can occur while loading the exemplar corpus or the catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A corpus file is not the JSON shape we expect
    #[error("Malformed JSON in {file}: {source}")]
    JsonError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The catalog CSV could not be read
    #[error("Malformed CSV in {file}: {source}")]
    CsvError {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// Sentence and embedding lists for one corpus key are not index-aligned
    #[error("Corpus key {key}: {sentences} sentences but {embeddings} embeddings")]
    LengthMismatch {
        key: String,
        sentences: usize,
        embeddings: usize,
    },

    /// An exemplar embedding does not have the corpus dimension
    #[error("Corpus key {key}, exemplar {index}: expected dimension {expected}, found {found}")]
    DimensionMismatch {
        key: String,
        index: usize,
        expected: usize,
        found: usize,
    },

    /// The catalog has none of the columns it cannot do without
    #[error("Catalog {file} has no {column} column")]
    MissingColumn { file: String, column: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
