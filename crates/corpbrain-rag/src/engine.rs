//! The engine: retrieve, assemble, generate

use std::sync::Arc;
use std::time::Instant;

use crate::assembly::EvidenceAssembler;
use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::GroundedGenerator;
use crate::index::{DenseIndex, LexicalIndex};
use crate::providers::{EvidenceStore, GenerativeProvider};
use crate::retrieval::HybridRetriever;
use crate::types::{QueryRequest, QueryResponse};

/// Hybrid retrieval-and-fusion engine
///
/// Owns the full query pipeline: fusion retrieval over the dense and lexical
/// indices, evidence assembly, and grounded generation. Constructed
/// explicitly (there is no lazy module-level singleton), and the lexical
/// index has an explicit build/rebuild lifecycle.
pub struct RagEngine {
    store: Arc<dyn EvidenceStore>,
    retriever: HybridRetriever,
    assembler: EvidenceAssembler,
    generator: GroundedGenerator,
}

impl RagEngine {
    /// Create an engine over the given store and generative provider
    ///
    /// The lexical index starts empty; call [`build_index`](Self::build_index)
    /// before serving queries.
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        llm: Arc<dyn GenerativeProvider>,
        config: RagConfig,
    ) -> Self {
        let dense = DenseIndex::new(Arc::clone(&store));
        Self {
            store,
            retriever: HybridRetriever::new(dense, config.retrieval),
            assembler: EvidenceAssembler::new(),
            generator: GroundedGenerator::new(llm),
        }
    }

    /// Build (or rebuild) the lexical index from a full store snapshot
    ///
    /// The new index is fully built before it becomes visible; in-flight
    /// queries keep reading the previous one until the atomic swap. Returns
    /// the number of indexed units.
    pub async fn build_index(&self) -> Result<usize> {
        let units = self.store.get_all().await?;
        let count = units.len();

        let index = LexicalIndex::build(&units);
        self.retriever.swap_lexical(index);

        tracing::info!("Lexical index built over {} evidence units", count);
        Ok(count)
    }

    /// Answer a query, returning the answer and the evidence it used
    ///
    /// A retrieval or generation failure surfaces as a single error; no
    /// partial evidence is ever returned for a failed call. Zero retrieved
    /// evidence is not a failure: the generator still runs and answers
    /// honestly from an empty context.
    pub async fn invoke(&self, request: QueryRequest) -> Result<QueryResponse> {
        let start = Instant::now();
        tracing::info!("Query: \"{}\"", request.input);

        let evidence = self.retriever.retrieve(&request.input).await?;
        if evidence.is_empty() {
            tracing::info!("No evidence retrieved; answering from empty context");
        }

        let assembled = self.assembler.assemble(&evidence).await;
        let result = self
            .generator
            .generate(&request.input, assembled, evidence)
            .await?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Query completed in {}ms, {} evidence units",
            processing_time_ms,
            result.evidence.len()
        );

        Ok(QueryResponse {
            answer: result.answer,
            context: result.evidence,
            processing_time_ms,
        })
    }

    /// The underlying evidence store (shared with the ingestion collaborator)
    pub fn store(&self) -> &Arc<dyn EvidenceStore> {
        &self.store
    }

    /// Number of units in the current lexical index
    pub fn indexed_units(&self) -> usize {
        self.retriever.lexical_len()
    }
}
