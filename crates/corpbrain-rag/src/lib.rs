//! corpbrain-rag: hybrid retrieval-and-fusion engine for grounded QA
//!
//! Answers natural-language questions over a private document corpus by
//! combining dense (vector) and lexical (BM25) retrieval, fusing both ranked
//! lists with weighted reciprocal-rank fusion, and assembling the fused
//! evidence (text chunks and image-derived summaries alike) into a single
//! grounded generation request. Every answer is returned together with the
//! exact evidence set that produced it, so callers can render citations
//! without re-deriving anything.
//!
//! Document parsing, rasterization, and the chat surface live outside this
//! crate; it consumes finished evidence units through the [`providers`]
//! boundaries and exposes one entry point, [`RagEngine::invoke`].

pub mod assembly;
pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod index;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
pub use types::{
    evidence::{EvidenceKey, EvidenceKind, EvidenceUnit, ScoredUnit},
    query::QueryRequest,
    response::QueryResponse,
};
