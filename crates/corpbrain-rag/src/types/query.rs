//! Query request types

use serde::{Deserialize, Serialize};

/// A single user query against the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The natural-language question to answer
    pub input: String,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
