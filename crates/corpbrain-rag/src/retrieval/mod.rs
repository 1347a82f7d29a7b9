//! Hybrid retrieval: dense + lexical lists merged by reciprocal-rank fusion

pub mod fusion;

pub use fusion::HybridRetriever;
