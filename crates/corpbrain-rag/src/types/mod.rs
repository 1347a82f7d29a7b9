//! Core data types for evidence, queries, and responses

pub mod evidence;
pub mod query;
pub mod response;

pub use evidence::{EvidenceKey, EvidenceKind, EvidenceUnit, ScoredUnit};
pub use query::QueryRequest;
pub use response::QueryResponse;
