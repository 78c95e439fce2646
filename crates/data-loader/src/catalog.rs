//! Track catalog loading.

use crate::error::Result;
use crate::parser;
use crate::types::Catalog;
use std::path::Path;
use tracing::info;

impl Catalog {
    /// Load the track catalog from a CSV file
    ///
    /// The header row decides the schema: optional columns (language,
    /// popularity, uri) that are absent simply disable what depends on them.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading track catalog from {}", path.display());

        let catalog = parser::parse_catalog(path)?;

        let schema = catalog.schema();
        info!(
            "Loaded {} tracks (language column: {}, popularity column: {}, {} feature columns)",
            catalog.len(),
            schema.has_language,
            schema.has_popularity,
            schema.feature_columns.len()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataLoadError;

    #[test]
    fn test_load_missing_catalog() {
        let err = Catalog::load_from_file(Path::new("data/does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_dataset() {
        // Runs only when the real catalog is present
        let path = Path::new("../../data/spotify_tracknames_updated.csv");

        if path.exists() {
            let catalog = Catalog::load_from_file(path).unwrap();
            assert!(!catalog.is_empty());
        }
    }
}
