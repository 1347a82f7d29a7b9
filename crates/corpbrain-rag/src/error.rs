//! Error types for the retrieval-and-fusion engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Evidence store or index unreachable/timed out
    ///
    /// Never substituted with an empty result set: a failed retrieval must be
    /// visible to the caller, otherwise the generator would fabricate answers
    /// from nothing.
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Embedding generation failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generative model call failed or returned an empty completion
    ///
    /// A missing attachment is not an error anywhere in the pipeline: the
    /// assembler drops the image with a warning and keeps the unit's summary
    /// text. HTTP transport failures are folded into `Generation` or
    /// `Embedding` by the clients, which know which stage they serve.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}
