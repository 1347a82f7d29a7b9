//! Provider abstractions for evidence storage, embeddings, and generation
//!
//! Trait-based boundaries that allow switching between cloud (Gemini) and
//! local (Ollama, in-memory) backends.

pub mod embedding;
pub mod evidence_store;
pub mod gemini;
pub mod llm;
pub mod memory;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use evidence_store::EvidenceStore;
pub use gemini::GeminiClient;
pub use llm::GenerativeProvider;
pub use memory::InMemoryEvidenceStore;
pub use ollama::OllamaClient;
