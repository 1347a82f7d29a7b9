//! Evidence store trait: the similarity backend holding all evidence units

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EvidenceUnit, ScoredUnit};

/// Trait for durable evidence storage with approximate nearest-neighbor search
///
/// The store embeds query text internally. The embedding function used at
/// query time MUST be the same one used at ingestion time: a mismatch does
/// not error, it silently degrades relevance with no signal at all. This is a
/// documented hard invariant of the boundary; implementations should make it
/// structurally true (e.g. by owning a single `EmbeddingProvider` for both
/// paths) rather than relying on callers.
///
/// Implementations:
/// - `InMemoryEvidenceStore`: brute-force cosine reference store
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Full snapshot of every stored unit, used to build the lexical index
    async fn get_all(&self) -> Result<Vec<EvidenceUnit>>;

    /// Nearest units to the query text by vector distance
    ///
    /// Returns at most `k` results, best first.
    async fn similarity_search(&self, query_text: &str, k: usize) -> Result<Vec<ScoredUnit>>;

    /// Bulk-insert units, embedding their content
    ///
    /// Supports the ingestion collaborator's incremental batched writes; the
    /// engine itself only reads.
    async fn add_units(&self, units: &[EvidenceUnit]) -> Result<()>;

    /// Number of stored units
    async fn len(&self) -> Result<usize>;

    /// Check if the store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
