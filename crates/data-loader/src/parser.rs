//! Parsers for the corpus and catalog files.
//!
//! This module handles the on-disk formats:
//! - example_sentences.json: `{"energy_high": ["...", ...], "energy_low": [...], ...}`
//! - feature_embeddings.json: `{"energy_high": [[0.1, ...], ...], ...}`, index-aligned
//!   with the sentence file
//! - the track catalog CSV, with a header row naming its columns
//!
//! Rust concepts you'll see here:
//! - serde for JSON decoding straight into collections
//! - The `csv` crate's header-driven record access
//! - Generic `R: Read` parameters so parsing is testable from memory

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Sentences per corpus key, in file order
pub type SentencesByKey = BTreeMap<String, Vec<String>>;

/// Embeddings per corpus key, index-aligned with [`SentencesByKey`]
pub type EmbeddingsByKey = BTreeMap<String, Vec<Vec<f32>>>;

/// Title columns, in order of preference
const TITLE_COLUMNS: [&str; 2] = ["track_name", "name"];
/// Artist columns, in order of preference
const ARTIST_COLUMNS: [&str; 2] = ["artist_name", "artists"];
/// URI columns, in order of preference
const URI_COLUMNS: [&str; 3] = ["track_uri", "track_url", "uri"];

const UNKNOWN: &str = "Unknown";

/// Open a file, reporting a missing file as `FileNotFound`
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse example_sentences.json
pub fn parse_sentences(path: &Path) -> Result<SentencesByKey> {
    let reader = BufReader::new(open(path)?);
    serde_json::from_reader(reader).map_err(|source| DataLoadError::JsonError {
        file: file_label(path),
        source,
    })
}

/// Parse feature_embeddings.json
pub fn parse_embeddings(path: &Path) -> Result<EmbeddingsByKey> {
    let reader = BufReader::new(open(path)?);
    serde_json::from_reader(reader).map_err(|source| DataLoadError::JsonError {
        file: file_label(path),
        source,
    })
}

/// Parse a catalog CSV file
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let reader = BufReader::new(open(path)?);
    parse_catalog_reader(reader, &file_label(path))
}

/// Column positions resolved once from the header row
struct ColumnMap {
    titles: Vec<usize>,
    artists: Vec<usize>,
    uri: Option<usize>,
    language: Option<usize>,
    popularity: Option<usize>,
    features: [Option<usize>; FeatureName::COUNT],
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let mut features = [None; FeatureName::COUNT];
        for feature in FeatureName::ALL {
            features[feature.index()] = position(feature.as_str());
        }

        Self {
            titles: TITLE_COLUMNS.iter().filter_map(|c| position(*c)).collect(),
            artists: ARTIST_COLUMNS.iter().filter_map(|c| position(*c)).collect(),
            uri: URI_COLUMNS.iter().find_map(|c| position(*c)),
            language: position("language"),
            popularity: position("popularity"),
            features,
        }
    }

    fn schema(&self) -> CatalogSchema {
        CatalogSchema {
            has_language: self.language.is_some(),
            has_popularity: self.popularity.is_some(),
            has_uri: self.uri.is_some(),
            feature_columns: FeatureName::ALL
                .into_iter()
                .filter(|f| self.features[f.index()].is_some())
                .collect(),
        }
    }
}

/// Non-empty, trimmed cell text. Empty cells are null.
fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<&str> {
    let value = record.get(idx?)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

/// First non-null cell among the candidate columns, else "Unknown"
fn first_text(record: &csv::StringRecord, columns: &[usize]) -> String {
    columns
        .iter()
        .find_map(|&idx| cell(record, Some(idx)))
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Outcome of reading one numeric cell
#[derive(Debug, PartialEq)]
enum NumericCell {
    Null,
    Value(f32),
    Malformed,
}

fn parse_numeric(raw: Option<&str>) -> NumericCell {
    match raw {
        None => NumericCell::Null,
        Some(text) => match text.parse::<f32>() {
            // "nan" / "inf" parse successfully but carry no usable value
            Ok(value) if value.is_finite() => NumericCell::Value(value),
            Ok(_) => NumericCell::Null,
            Err(_) => NumericCell::Malformed,
        },
    }
}

/// Parse a catalog from any reader
///
/// Unparsable numeric cells are treated as null and counted on the catalog;
/// the row itself is kept.
pub fn parse_catalog_reader<R: Read>(reader: R, file: &str) -> Result<Catalog> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| DataLoadError::CsvError {
            file: file.to_string(),
            source,
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers);
    let schema = columns.schema();

    if schema.feature_columns.is_empty() {
        return Err(DataLoadError::MissingColumn {
            file: file.to_string(),
            column: "audio feature".to_string(),
        });
    }

    for feature in FeatureName::ALL {
        if !schema.has_feature(feature) {
            warn!("Catalog {} has no {} column; values will score as 0", file, feature);
        }
    }

    let mut catalog = Catalog::new(schema);

    for record in csv_reader.records() {
        let record = record.map_err(|source| DataLoadError::CsvError {
            file: file.to_string(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let mut read_number = |column: Option<usize>, field: &str| -> Option<f32> {
            match parse_numeric(cell(&record, column)) {
                NumericCell::Value(value) => Some(value),
                NumericCell::Null => None,
                NumericCell::Malformed => {
                    debug!("{} line {}: unparsable {} value", file, line, field);
                    catalog.malformed_values += 1;
                    None
                }
            }
        };

        let mut features = [None; FeatureName::COUNT];
        for feature in FeatureName::ALL {
            features[feature.index()] =
                read_number(columns.features[feature.index()], feature.as_str());
        }
        let popularity = read_number(columns.popularity, "popularity");

        let track = Track {
            title: first_text(&record, &columns.titles),
            artist: first_text(&record, &columns.artists),
            uri: cell(&record, columns.uri).map(str::to_string),
            language: cell(&record, columns.language).map(str::to_string),
            popularity,
            features,
        };
        catalog.insert_track(track);
    }

    if catalog.malformed_values > 0 {
        warn!(
            "Catalog {}: {} unparsable numeric values treated as null",
            file, catalog.malformed_values
        );
    }

    Ok(catalog)
}
