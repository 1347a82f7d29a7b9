//! Lexical index: BM25 term statistics over evidence content
//!
//! Built once from a full snapshot of the evidence store and immutable
//! afterwards; rebuilds produce a fresh index that the retriever swaps in
//! atomically. Rebuild cost is O(corpus), acceptable for an append-mostly
//! corpus that is reindexed at process start.

use std::collections::{HashMap, HashSet};

use crate::types::{EvidenceUnit, ScoredUnit};

const BM25_K1: f64 = 1.2;
const BM25_B: f64 = 0.75;

/// BM25 index over evidence unit content
pub struct LexicalIndex {
    units: Vec<EvidenceUnit>,
    /// Per-unit term frequencies
    term_counts: Vec<HashMap<String, usize>>,
    /// Per-unit token counts
    unit_lens: Vec<usize>,
    /// Document frequency: number of units containing each term
    df: HashMap<String, usize>,
    avg_len: f64,
}

impl LexicalIndex {
    /// Build an index from a full evidence snapshot
    pub fn build(units: &[EvidenceUnit]) -> Self {
        let tokenized: Vec<Vec<String>> = units.iter().map(|u| tokenize(&u.content)).collect();

        let mut df: HashMap<String, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&String> = tokens.iter().collect();
            for term in unique {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let unit_lens: Vec<usize> = tokenized.iter().map(|t| t.len()).collect();
        let avg_len = if unit_lens.is_empty() {
            0.0
        } else {
            unit_lens.iter().sum::<usize>() as f64 / unit_lens.len() as f64
        };

        let term_counts: Vec<HashMap<String, usize>> = tokenized
            .into_iter()
            .map(|tokens| {
                let mut counts = HashMap::new();
                for token in tokens {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        tracing::debug!("Built lexical index over {} evidence units", units.len());

        Self {
            units: units.to_vec(),
            term_counts,
            unit_lens,
            df,
            avg_len,
        }
    }

    /// Number of indexed units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Rank units against the query by BM25 score
    ///
    /// Returns at most `k` results, best first. An empty corpus or a query
    /// with no indexed terms yields an empty list, never an error. Ties keep
    /// corpus order (the sort is stable).
    pub fn query(&self, text: &str, k: usize) -> Vec<ScoredUnit> {
        if self.units.is_empty() || k == 0 {
            return Vec::new();
        }

        let query_terms = tokenize(text);
        if query_terms.is_empty() {
            return Vec::new();
        }

        let n = self.units.len() as f64;
        let mut results: Vec<ScoredUnit> = Vec::new();

        for (i, unit) in self.units.iter().enumerate() {
            let mut score = 0.0f64;
            let len_norm = 1.0 - BM25_B + BM25_B * self.unit_lens[i] as f64 / self.avg_len.max(1.0);

            for term in &query_terms {
                let Some(&tf) = self.term_counts[i].get(term) else {
                    continue;
                };
                let doc_freq = *self.df.get(term).unwrap_or(&0) as f64;
                let idf = ((n - doc_freq + 0.5) / (doc_freq + 0.5) + 1.0).ln();
                let tf = tf as f64;
                score += idf * tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * len_norm);
            }

            if score > 0.0 {
                results.push(ScoredUnit {
                    unit: unit.clone(),
                    score: score as f32,
                });
            }
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        results
    }
}

/// Lowercase alphanumeric tokenizer with stop-word removal
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| w.len() > 2 && !is_stop_word(w))
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and"
            | "for"
            | "are"
            | "but"
            | "not"
            | "you"
            | "all"
            | "can"
            | "has"
            | "have"
            | "been"
            | "from"
            | "this"
            | "that"
            | "with"
            | "they"
            | "will"
            | "what"
            | "its"
            | "into"
            | "about"
    )
}
