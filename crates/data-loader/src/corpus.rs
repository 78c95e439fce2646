//! ExemplarCorpus building and validation logic.
//!
//! This module turns the two parsed corpus files into an `ExemplarCorpus`:
//! - Pair every sentence with its embedding (the files are index-aligned)
//! - Group exemplars by (feature, polarity)
//! - Check every embedding shares one dimension

use crate::error::{DataLoadError, Result};
use crate::parser::{self, EmbeddingsByKey, SentencesByKey};
use crate::types::*;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

impl ExemplarCorpus {
    /// Load the exemplar corpus from its sentence and embedding files
    ///
    /// Steps:
    /// 1. Parse both JSON files (in parallel, the embedding file is large)
    /// 2. Pair sentences with embeddings per key
    /// 3. Validate lengths and dimensions
    pub fn load_from_files(sentences_path: &Path, embeddings_path: &Path) -> Result<Self> {
        info!(
            "Loading exemplar corpus from {} and {}",
            sentences_path.display(),
            embeddings_path.display()
        );

        let (sentences, embeddings) = rayon::join(
            || parser::parse_sentences(sentences_path),
            || parser::parse_embeddings(embeddings_path),
        );
        let corpus = Self::from_parts(sentences?, embeddings?)?;

        info!(
            "Loaded {} exemplars, {} resolvable features, dimension {:?}",
            corpus.len(),
            corpus.resolvable_features().len(),
            corpus.dimension()
        );
        Ok(corpus)
    }

    /// Build a corpus from already-parsed sentence and embedding maps
    ///
    /// Keys outside the `"{feature}_{high|low}"` scheme are ignored. A key
    /// present in only one map is a length mismatch.
    pub fn from_parts(mut sentences: SentencesByKey, mut embeddings: EmbeddingsByKey) -> Result<Self> {
        let mut corpus = ExemplarCorpus::new();

        let keys: BTreeSet<String> = sentences
            .keys()
            .chain(embeddings.keys())
            .cloned()
            .collect();

        for key in keys {
            let texts = sentences.remove(&key).unwrap_or_default();
            let vectors = embeddings.remove(&key).unwrap_or_default();

            let Some((feature, polarity)) = parse_corpus_key(&key) else {
                warn!("Ignoring corpus key {} (not a feature_high/low key)", key);
                continue;
            };

            if texts.len() != vectors.len() {
                return Err(DataLoadError::LengthMismatch {
                    key,
                    sentences: texts.len(),
                    embeddings: vectors.len(),
                });
            }

            let exemplars = texts
                .into_iter()
                .zip(vectors)
                .map(|(text, embedding)| ExemplarSentence {
                    feature,
                    polarity,
                    text,
                    embedding,
                })
                .collect();
            corpus.insert_set(feature, polarity, exemplars)?;
        }

        for feature in FeatureName::ALL {
            if !corpus.is_resolvable(feature) {
                warn!("Feature {} lacks high or low exemplars; it will be skipped", feature);
            }
        }

        Ok(corpus)
    }

    /// Insert (or replace) the exemplar set for one feature polarity
    ///
    /// Fails if any embedding disagrees with the corpus dimension.
    pub fn insert_set(
        &mut self,
        feature: FeatureName,
        polarity: Polarity,
        exemplars: Vec<ExemplarSentence>,
    ) -> Result<()> {
        for (index, exemplar) in exemplars.iter().enumerate() {
            let found = exemplar.embedding.len();
            match self.dimension {
                None => self.dimension = Some(found),
                Some(expected) if expected != found => {
                    return Err(DataLoadError::DimensionMismatch {
                        key: corpus_key(feature, polarity),
                        index,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
        }
        self.sets.insert((feature, polarity), exemplars);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(feature: FeatureName, polarity: Polarity) -> String {
        corpus_key(feature, polarity)
    }

    fn parts() -> (SentencesByKey, EmbeddingsByKey) {
        let mut sentences = SentencesByKey::new();
        let mut embeddings = EmbeddingsByKey::new();

        sentences.insert(
            key(FeatureName::Energy, Polarity::High),
            vec!["Pounding drums".to_string(), "Wild and loud".to_string()],
        );
        embeddings.insert(
            key(FeatureName::Energy, Polarity::High),
            vec![vec![1.0, 0.0], vec![0.9, 0.1]],
        );
        sentences.insert(
            key(FeatureName::Energy, Polarity::Low),
            vec!["A quiet hum".to_string()],
        );
        embeddings.insert(key(FeatureName::Energy, Polarity::Low), vec![vec![0.0, 1.0]]);

        (sentences, embeddings)
    }

    #[test]
    fn test_from_parts_groups_by_feature_and_polarity() {
        let (sentences, embeddings) = parts();
        let corpus = ExemplarCorpus::from_parts(sentences, embeddings).unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.dimension(), Some(2));
        assert_eq!(corpus.exemplars(FeatureName::Energy, Polarity::High).len(), 2);
        assert_eq!(
            corpus.exemplars(FeatureName::Energy, Polarity::Low)[0].text,
            "A quiet hum"
        );
        assert_eq!(corpus.resolvable_features(), vec![FeatureName::Energy]);
    }

    #[test]
    fn test_feature_with_one_polarity_is_not_resolvable() {
        let (mut sentences, mut embeddings) = parts();
        sentences.insert(key(FeatureName::Tempo, Polarity::High), vec!["Fast".to_string()]);
        embeddings.insert(key(FeatureName::Tempo, Polarity::High), vec![vec![0.5, 0.5]]);

        let corpus = ExemplarCorpus::from_parts(sentences, embeddings).unwrap();

        assert!(!corpus.is_resolvable(FeatureName::Tempo));
        assert!(corpus.is_resolvable(FeatureName::Energy));
    }

    #[test]
    fn test_length_mismatch_fails() {
        let (sentences, mut embeddings) = parts();
        embeddings.insert(key(FeatureName::Energy, Polarity::Low), vec![]);

        let err = ExemplarCorpus::from_parts(sentences, embeddings).unwrap_err();
        assert!(matches!(err, DataLoadError::LengthMismatch { sentences: 1, embeddings: 0, .. }));
    }

    #[test]
    fn test_key_in_one_file_only_fails() {
        let (mut sentences, embeddings) = parts();
        sentences.insert(key(FeatureName::Valence, Polarity::Low), vec!["Sad".to_string()]);

        let err = ExemplarCorpus::from_parts(sentences, embeddings).unwrap_err();
        assert!(matches!(err, DataLoadError::LengthMismatch { .. }));
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let (sentences, mut embeddings) = parts();
        embeddings.insert(key(FeatureName::Energy, Polarity::Low), vec![vec![0.0, 1.0, 0.0]]);

        let err = ExemplarCorpus::from_parts(sentences, embeddings).unwrap_err();
        assert!(matches!(err, DataLoadError::DimensionMismatch { expected: 2, found: 3, .. }));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (mut sentences, mut embeddings) = parts();
        sentences.insert("mood_high".to_string(), vec!["Happy".to_string()]);
        embeddings.insert("mood_high".to_string(), vec![vec![1.0, 1.0]]);

        let corpus = ExemplarCorpus::from_parts(sentences, embeddings).unwrap();
        assert_eq!(corpus.len(), 3);
    }

    /// Write the two corpus files into a fresh directory under the temp dir
    fn write_corpus_files(name: &str, sentences: &str, embeddings: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("moodmix-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let sentences_path = dir.join("example_sentences.json");
        let embeddings_path = dir.join("feature_embeddings.json");
        std::fs::write(&sentences_path, sentences).unwrap();
        std::fs::write(&embeddings_path, embeddings).unwrap();
        (sentences_path, embeddings_path)
    }

    #[test]
    fn test_load_from_files() {
        let (sentences_path, embeddings_path) = write_corpus_files(
            "corpus-ok",
            r#"{
                "energy_high": ["Pounding drums", "Wild and loud"],
                "energy_low": ["A quiet hum"],
                "tempo_high": ["Racing beat"]
            }"#,
            r#"{
                "energy_high": [[1.0, 0.0, 0.0], [0.9, 0.1, 0.0]],
                "energy_low": [[0.0, 1.0, 0.0]],
                "tempo_high": [[0.0, 0.0, 1.0]]
            }"#,
        );

        let corpus = ExemplarCorpus::load_from_files(&sentences_path, &embeddings_path).unwrap();

        assert_eq!(corpus.len(), 4);
        assert_eq!(corpus.dimension(), Some(3));
        assert_eq!(corpus.resolvable_features(), vec![FeatureName::Energy]);

        let low = corpus.exemplars(FeatureName::Energy, Polarity::Low);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].text, "A quiet hum");
        assert_eq!(low[0].embedding, vec![0.0, 1.0, 0.0]);

        if let Some(dir) = sentences_path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_load_from_files_malformed_json() {
        let (sentences_path, embeddings_path) = write_corpus_files(
            "corpus-bad-json",
            r#"{"energy_high": ["Pounding drums"]}"#,
            r#"{"energy_high": [[1.0, 0.0], "#,
        );

        let err = ExemplarCorpus::load_from_files(&sentences_path, &embeddings_path).unwrap_err();
        match err {
            DataLoadError::JsonError { file, .. } => assert_eq!(file, "feature_embeddings.json"),
            other => panic!("expected JsonError, got {other:?}"),
        }

        if let Some(dir) = sentences_path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_load_from_files_wrong_shape() {
        // Valid JSON, but sentences must be strings
        let (sentences_path, embeddings_path) = write_corpus_files(
            "corpus-bad-shape",
            r#"{"energy_high": [1, 2]}"#,
            r#"{"energy_high": [[1.0, 0.0], [0.0, 1.0]]}"#,
        );

        let err = ExemplarCorpus::load_from_files(&sentences_path, &embeddings_path).unwrap_err();
        assert!(matches!(err, DataLoadError::JsonError { ref file, .. } if file == "example_sentences.json"));

        if let Some(dir) = sentences_path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }
}
