//! Retrieval indices: lexical (term statistics) and dense (vector similarity)

pub mod dense;
pub mod lexical;

pub use dense::DenseIndex;
pub use lexical::LexicalIndex;
