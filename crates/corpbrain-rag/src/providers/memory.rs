//! In-memory evidence store: brute-force cosine similarity reference backend

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{EvidenceUnit, ScoredUnit};

use super::embedding::EmbeddingProvider;
use super::evidence_store::EvidenceStore;

/// Evidence store backed by a flat in-memory list
///
/// Owns a single `EmbeddingProvider` used for both ingestion and queries,
/// which makes the embedding-identity invariant of [`EvidenceStore`]
/// structurally true. Suitable for tests, demos, and small corpora; a
/// production deployment plugs a real similarity backend into the same trait.
pub struct InMemoryEvidenceStore {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: RwLock<Vec<(EvidenceUnit, Vec<f32>)>>,
}

impl InMemoryEvidenceStore {
    /// Create an empty store over the given embedder
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    async fn get_all(&self) -> Result<Vec<EvidenceUnit>> {
        Ok(self.entries.read().iter().map(|(u, _)| u.clone()).collect())
    }

    async fn similarity_search(&self, query_text: &str, k: usize) -> Result<Vec<ScoredUnit>> {
        let query_embedding = self.embedder.embed(query_text).await?;

        let mut results: Vec<ScoredUnit> = {
            let entries = self.entries.read();
            entries
                .iter()
                .map(|(unit, embedding)| ScoredUnit {
                    unit: unit.clone(),
                    score: cosine_similarity(&query_embedding, embedding),
                })
                .collect()
        };

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }

    async fn add_units(&self, units: &[EvidenceUnit]) -> Result<()> {
        let texts: Vec<String> = units.iter().map(|u| u.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut entries = self.entries.write();
        for (unit, embedding) in units.iter().zip(embeddings) {
            entries.push((unit.clone(), embedding));
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        self.embedder.health_check().await
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Cosine similarity between two vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn mismatched_dimensions_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
