//! Prompt templates for grounded generation

/// Prompt builder for grounded question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Fixed system instruction for every generation request
    ///
    /// Grounding is the whole point: answers must come only from the supplied
    /// context, and an honest "I don't know" is required, not merely
    /// suggested, whenever the context is insufficient or empty. Ungrounded
    /// answers are the primary failure mode this engine exists to prevent.
    pub fn system_instruction() -> String {
        "You are an assistant for question-answering tasks. \
         Use only the pieces of retrieved context below to answer the question; \
         never draw on outside knowledge. \
         If the context does not contain the answer, or no context is provided, \
         say that you don't know. \
         Use three sentences maximum and keep the answer concise. \
         Context entries are numbered with their source documents; \
         attached images belong to the image descriptions in the context."
            .to_string()
    }

    /// Combine the context block and question into the user-visible text part
    pub fn user_text(context: &str, question: &str) -> String {
        if context.is_empty() {
            format!("Context: (no evidence retrieved)\n\nQuestion: {question}")
        } else {
            format!("Context:\n{context}\n\nQuestion: {question}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_requires_honest_refusal() {
        let instruction = PromptBuilder::system_instruction();
        assert!(instruction.contains("don't know"));
        assert!(instruction.contains("retrieved context"));
    }

    #[test]
    fn user_text_marks_empty_context() {
        let text = PromptBuilder::user_text("", "What is the vacation policy?");
        assert!(text.contains("no evidence retrieved"));
        assert!(text.contains("What is the vacation policy?"));
    }
}
