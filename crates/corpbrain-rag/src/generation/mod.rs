//! Grounded answer generation

pub mod generator;
pub mod prompt;

pub use generator::{GenerationRequest, GenerationResult, GroundedGenerator};
pub use prompt::PromptBuilder;
