//! Configuration for the retrieval-and-fusion engine

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Hybrid retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Generative model configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Hybrid retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Results requested from the dense index per query
    #[serde(default = "default_fan_in")]
    pub dense_k: usize,
    /// Results requested from the lexical index per query
    #[serde(default = "default_fan_in")]
    pub lexical_k: usize,
    /// Weight applied to dense ranks during fusion
    #[serde(default = "default_weight")]
    pub dense_weight: f64,
    /// Weight applied to lexical ranks during fusion
    #[serde(default = "default_weight")]
    pub lexical_weight: f64,
    /// Reciprocal-rank smoothing constant
    ///
    /// Higher values flatten the contribution of top ranks from any single
    /// list. 60 is the conventional default.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f64,
}

fn default_fan_in() -> usize {
    5
}

fn default_weight() -> f64 {
    0.5
}

fn default_rrf_k() -> f64 {
    60.0
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            dense_k: 5,
            lexical_k: 5,
            dense_weight: 0.5,
            lexical_weight: 0.5,
            rrf_k: 60.0,
        }
    }
}

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the model API
    ///
    /// Gemini: `https://generativelanguage.googleapis.com/v1beta`
    /// Ollama: `http://localhost:11434`
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// API key; falls back to the `GEMINI_API_KEY` environment variable
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    ///
    /// The model call is the pipeline's only unbounded suspension point, so
    /// every client enforces this timeout. A timed-out call fails; it is
    /// never retried inside the engine.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum output tokens
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.0
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
            temperature: 0.0,
            timeout_secs: 60,
            max_output_tokens: 2048,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from config or environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Batch size for bulk embedding during ingestion
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    80
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "gemini-embedding-001".to_string(),
            dimensions: 768,
            batch_size: 80,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_ensemble_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.retrieval.dense_k, 5);
        assert_eq!(config.retrieval.lexical_k, 5);
        assert_eq!(config.retrieval.dense_weight, 0.5);
        assert_eq!(config.retrieval.lexical_weight, 0.5);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RagConfig = toml::from_str(
            r#"
            [retrieval]
            dense_k = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.dense_k, 8);
        assert_eq!(config.retrieval.lexical_k, 5);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
    }
}
