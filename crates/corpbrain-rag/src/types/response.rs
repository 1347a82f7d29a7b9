//! Response types for answered queries

use serde::{Deserialize, Serialize};

use super::evidence::EvidenceUnit;

/// Response returned from `invoke`
///
/// `context` is exactly the fused evidence set consumed to produce the
/// answer, in fused order; the caller renders citations from it without
/// re-deriving anything, deciding per unit `kind` whether to show an inline
/// image or a plain source reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer
    pub answer: String,
    /// Evidence the answer was grounded in, in fused order
    pub context: Vec<EvidenceUnit>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
