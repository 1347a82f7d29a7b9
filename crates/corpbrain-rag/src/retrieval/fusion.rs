//! Weighted reciprocal-rank fusion of dense and lexical ranked lists
//!
//! Dense cosine scores and lexical term statistics are not comparable, so the
//! lists are merged by rank position only: each unit scores
//! `Σ weight_list / (rank_in_list + rrf_k)` over the lists containing it,
//! with 1-based ranks. Units surfacing in both lists accumulate both
//! contributions, which is what pushes corroborated evidence to the top;
//! concatenation or raw-score sorting cannot do that.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::index::{DenseIndex, LexicalIndex};
use crate::types::{EvidenceKey, EvidenceUnit, ScoredUnit};

/// Drives the dense and lexical indices and fuses their rankings
///
/// The lexical index is replaced wholesale on rebuild: a new index is fully
/// built before it becomes visible, so in-flight queries keep reading the old
/// one. The live index is never mutated in place.
pub struct HybridRetriever {
    dense: DenseIndex,
    lexical: RwLock<Arc<LexicalIndex>>,
    config: RetrievalConfig,
}

impl HybridRetriever {
    /// Create a retriever with an empty lexical index
    pub fn new(dense: DenseIndex, config: RetrievalConfig) -> Self {
        Self {
            dense,
            lexical: RwLock::new(Arc::new(LexicalIndex::build(&[]))),
            config,
        }
    }

    /// Atomically swap in a freshly built lexical index
    pub fn swap_lexical(&self, index: LexicalIndex) {
        *self.lexical.write() = Arc::new(index);
    }

    /// Number of units in the current lexical index
    pub fn lexical_len(&self) -> usize {
        self.lexical.read().len()
    }

    /// Retrieve and fuse evidence for a query
    ///
    /// The two index queries are independent, pure functions of the query
    /// string over immutable indices. Both lists empty is a valid non-error
    /// state yielding an empty result; an unreachable store is an error and
    /// is never papered over with an empty list.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceUnit>> {
        let dense_list = self.dense.query(query, self.config.dense_k).await?;
        let lexical_list = {
            let index = self.lexical.read().clone();
            index.query(query, self.config.lexical_k)
        };

        tracing::debug!(
            "Fusing {} dense and {} lexical results",
            dense_list.len(),
            lexical_list.len()
        );

        Ok(fuse(
            &[
                (&dense_list, self.config.dense_weight),
                (&lexical_list, self.config.lexical_weight),
            ],
            self.config.rrf_k,
        ))
    }
}

struct Candidate {
    unit: EvidenceUnit,
    score: f64,
    first_seen: usize,
}

/// Fuse weighted ranked lists into a single deduplicated ordering
///
/// Within each list, duplicate units (by `(source, page, kind)` identity)
/// count once at their best rank. Across lists, contributions accumulate.
/// Ties break by first-seen order across the lists as given, which keeps the
/// output deterministic.
pub fn fuse(lists: &[(&[ScoredUnit], f64)], rrf_k: f64) -> Vec<EvidenceUnit> {
    let mut candidates: HashMap<EvidenceKey, Candidate> = HashMap::new();
    let mut next_seen = 0usize;

    for (list, weight) in lists {
        let mut seen_in_list: HashSet<EvidenceKey> = HashSet::new();
        for (i, scored) in list.iter().enumerate() {
            let key = scored.unit.key();
            if !seen_in_list.insert(key.clone()) {
                continue;
            }

            let rank = (i + 1) as f64;
            let contribution = weight / (rank + rrf_k);

            match candidates.entry(key) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    entry.get_mut().score += contribution;
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(Candidate {
                        unit: scored.unit.clone(),
                        score: contribution,
                        first_seen: next_seen,
                    });
                    next_seen += 1;
                }
            }
        }
    }

    let mut fused: Vec<Candidate> = candidates.into_values().collect();
    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.first_seen.cmp(&b.first_seen))
    });

    fused.into_iter().map(|c| c.unit).collect()
}
