//! Small hand-built corpus shared by the unit tests.
//!
//! Axes of the 4-d embeddings: [calm, intense, acoustic, other].

use async_trait::async_trait;
use data_loader::{ExemplarCorpus, ExemplarSentence, FeatureName, Polarity};
use embedding_client::{EmbeddingError, EmbeddingProvider};

pub const CALM_QUERY: [f32; 4] = [1.0, 0.0, 0.2, 0.0];

fn set(feature: FeatureName, polarity: Polarity, rows: &[(&str, [f32; 4])]) -> Vec<ExemplarSentence> {
    rows.iter()
        .map(|(text, embedding)| ExemplarSentence {
            feature,
            polarity,
            text: text.to_string(),
            embedding: embedding.to_vec(),
        })
        .collect()
}

pub fn test_corpus() -> ExemplarCorpus {
    use FeatureName::*;
    use Polarity::*;

    let sets = [
        set(Energy, High, &[
            ("Pounding drums", [0.0, 1.0, 0.0, 0.0]),
            ("Wild and fast", [0.1, 0.9, 0.0, 0.1]),
        ]),
        set(Energy, Low, &[
            ("Soft and sleepy", [1.0, 0.0, 0.0, 0.0]),
            ("Quiet strings", [0.9, 0.0, 0.1, 0.0]),
            ("Slow afternoon", [0.5, 0.0, 0.0, 0.5]),
        ]),
        set(Loudness, High, &[("Blasting speakers", [0.0, 1.0, 0.0, 0.2])]),
        set(Loudness, Low, &[("Whispered vocals", [0.8, 0.0, 0.2, 0.0])]),
        set(Acousticness, High, &[("Unplugged guitar", [0.3, 0.0, 1.0, 0.0])]),
        set(Acousticness, Low, &[("Synth heavy", [0.0, 0.5, 0.0, 0.5])]),
        set(Tempo, High, &[("Racing beat", [0.0, 1.0, 0.0, 1.0])]),
    ];

    let mut corpus = ExemplarCorpus::new();
    for exemplars in sets {
        let (feature, polarity) = (exemplars[0].feature, exemplars[0].polarity);
        corpus
            .insert_set(feature, polarity, exemplars)
            .expect("fixture dimensions agree");
    }
    corpus
}

/// Returns the same vector for every text
pub struct FixedEmbedding {
    vector: Vec<f32>,
}

impl FixedEmbedding {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedding {
    fn name(&self) -> &str {
        "FixedEmbedding"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector.clone())
    }
}
