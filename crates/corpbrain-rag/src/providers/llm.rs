//! Generative model provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::GenerationRequest;

/// Trait for grounded answer generation
///
/// The provider accepts a single multi-part message (text segments plus zero
/// or more inline images) and returns a text completion in one blocking round
/// trip. No streaming, and no retries at this boundary; a timed-out or
/// failed call surfaces as an error.
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API (gemini-2.5-flash)
/// - `OllamaClient`: local Ollama server (llava, llama3.2-vision, etc.)
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Generate a completion for the assembled request
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
