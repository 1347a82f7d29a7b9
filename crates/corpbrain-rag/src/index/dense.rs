//! Dense index: thin wrapper over the evidence store's similarity search

use std::sync::Arc;

use crate::error::Result;
use crate::providers::EvidenceStore;
use crate::types::ScoredUnit;

/// Vector-similarity view of the evidence store
///
/// The store embeds the query with the same embedding function used at
/// ingestion; see the invariant documented on [`EvidenceStore`]. This wrapper
/// adds nothing beyond a ranked-list shape shared with the lexical index.
pub struct DenseIndex {
    store: Arc<dyn EvidenceStore>,
}

impl DenseIndex {
    /// Create a dense index over the given store
    pub fn new(store: Arc<dyn EvidenceStore>) -> Self {
        Self { store }
    }

    /// Nearest units to the query text, best first, at most `k`
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredUnit>> {
        self.store.similarity_search(text, k).await
    }
}
