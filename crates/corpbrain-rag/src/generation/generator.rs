//! Grounded generator: one request, one answer, evidence attached

use std::sync::Arc;

use crate::assembly::{AssembledEvidence, Attachment};
use crate::error::{Error, Result};
use crate::providers::GenerativeProvider;
use crate::types::EvidenceUnit;

use super::prompt::PromptBuilder;

/// A single multi-part generation request, assembled fresh per query
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fixed grounding instruction
    pub system: String,
    /// Source-labelled context block, in fused order
    pub context: String,
    /// The user's question
    pub question: String,
    /// Inline image attachments, in assembly order
    pub attachments: Vec<Attachment>,
}

impl GenerationRequest {
    /// Render the text portion of the request (context + question)
    pub fn user_text(&self) -> String {
        PromptBuilder::user_text(&self.context, &self.question)
    }
}

/// Answer plus the evidence that produced it
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Raw answer text from the model
    pub answer: String,
    /// Exactly the evidence set sent to the generator, order preserved
    pub evidence: Vec<EvidenceUnit>,
}

/// Builds one generation request per query and issues exactly one model call
///
/// No retries here: retry policy belongs below the transport boundary, and a
/// failed or timed-out call must surface as a failed query.
pub struct GroundedGenerator {
    llm: Arc<dyn GenerativeProvider>,
}

impl GroundedGenerator {
    /// Create a generator backed by the given provider
    pub fn new(llm: Arc<dyn GenerativeProvider>) -> Self {
        Self { llm }
    }

    /// Generate a grounded answer from assembled evidence
    ///
    /// Runs even when `evidence` is empty; the instruction then forces an
    /// honest "I don't know" rather than a fabricated answer. An empty
    /// completion is a generation failure, not a valid answer.
    pub async fn generate(
        &self,
        question: &str,
        assembled: AssembledEvidence,
        evidence: Vec<EvidenceUnit>,
    ) -> Result<GenerationResult> {
        let request = GenerationRequest {
            system: PromptBuilder::system_instruction(),
            context: assembled.text_block,
            question: question.to_string(),
            attachments: assembled.attachments,
        };

        tracing::info!(
            "Generating answer with {} ({}), {} attachment(s)",
            self.llm.name(),
            self.llm.model(),
            request.attachments.len()
        );

        let answer = self.llm.generate(&request).await?;
        if answer.trim().is_empty() {
            return Err(Error::generation("model returned an empty completion"));
        }

        Ok(GenerationResult { answer, evidence })
    }
}
