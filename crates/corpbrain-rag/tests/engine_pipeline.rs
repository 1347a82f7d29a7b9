//! End-to-end pipeline tests with mock providers

use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use corpbrain_rag::config::RagConfig;
use corpbrain_rag::engine::RagEngine;
use corpbrain_rag::error::{Error, Result};
use corpbrain_rag::generation::GenerationRequest;
use corpbrain_rag::providers::{
    EmbeddingProvider, EvidenceStore, GenerativeProvider, InMemoryEvidenceStore,
};
use corpbrain_rag::types::{EvidenceUnit, QueryRequest, ScoredUnit};

/// Deterministic bag-of-words hash embedder: shared terms produce cosine
/// overlap, which is enough signal for pipeline tests.
struct HashEmbedder;

const DIMS: usize = 64;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; DIMS];
        for token in text.to_lowercase().split_whitespace() {
            let mut h = 0usize;
            for b in token.bytes() {
                h = h.wrapping_mul(31).wrapping_add(b as usize);
            }
            v[h % DIMS] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// Mock model that honors the grounding instruction and records what it saw.
struct ScriptedLlm {
    last_attachment_count: Mutex<Option<usize>>,
}

impl ScriptedLlm {
    fn new() -> Self {
        Self {
            last_attachment_count: Mutex::new(None),
        }
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedLlm {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        *self.last_attachment_count.lock().unwrap() = Some(request.attachments.len());

        if request.context.is_empty() {
            Ok("I don't know; the provided documents do not cover this.".to_string())
        } else {
            Ok(format!(
                "Answer grounded in supplied context for: {}",
                request.question
            ))
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-test-model"
    }
}

/// Model that always fails.
struct FailingLlm;

#[async_trait]
impl GenerativeProvider for FailingLlm {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(Error::generation("model unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "none"
    }
}

/// Model that returns an empty completion.
struct EmptyLlm;

#[async_trait]
impl GenerativeProvider for EmptyLlm {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Ok("   ".to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "empty"
    }

    fn model(&self) -> &str {
        "none"
    }
}

/// Store whose every operation fails, as if unreachable.
struct UnreachableStore;

#[async_trait]
impl EvidenceStore for UnreachableStore {
    async fn get_all(&self) -> Result<Vec<EvidenceUnit>> {
        Err(Error::retrieval("store unreachable"))
    }

    async fn similarity_search(&self, _query_text: &str, _k: usize) -> Result<Vec<ScoredUnit>> {
        Err(Error::retrieval("store unreachable"))
    }

    async fn add_units(&self, _units: &[EvidenceUnit]) -> Result<()> {
        Err(Error::retrieval("store unreachable"))
    }

    async fn len(&self) -> Result<usize> {
        Err(Error::retrieval("store unreachable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

fn corpus() -> Vec<EvidenceUnit> {
    vec![
        EvidenceUnit::text(
            "Employees accrue fifteen vacation days per year, rising with tenure.",
            "handbook.pdf",
            Some(4),
        ),
        EvidenceUnit::text(
            "Travel expenses require itemized receipts within thirty days.",
            "expenses.pdf",
            Some(2),
        ),
        EvidenceUnit::text(
            "Vacation requests need manager approval two weeks in advance.",
            "handbook.pdf",
            Some(5),
        ),
    ]
}

async fn engine_with(
    units: Vec<EvidenceUnit>,
    llm: Arc<dyn GenerativeProvider>,
) -> (RagEngine, Arc<InMemoryEvidenceStore>) {
    let store = Arc::new(InMemoryEvidenceStore::new(Arc::new(HashEmbedder)));
    store.add_units(&units).await.unwrap();

    let engine = RagEngine::new(store.clone(), llm, RagConfig::default());
    engine.build_index().await.unwrap();
    (engine, store)
}

#[tokio::test]
async fn pipeline_returns_answer_with_deduplicated_evidence() {
    let (engine, _) = engine_with(corpus(), Arc::new(ScriptedLlm::new())).await;

    let response = engine
        .invoke(QueryRequest::new("How many vacation days do employees accrue?"))
        .await
        .unwrap();

    assert!(response.answer.contains("grounded in supplied context"));
    assert!(!response.context.is_empty());

    let mut keys = HashSet::new();
    for unit in &response.context {
        assert!(keys.insert(unit.key()), "duplicate evidence in response");
    }
}

#[tokio::test]
async fn empty_corpus_yields_honest_refusal_not_error() {
    let (engine, _) = engine_with(Vec::new(), Arc::new(ScriptedLlm::new())).await;
    assert_eq!(engine.indexed_units(), 0);

    let response = engine
        .invoke(QueryRequest::new("What is the vacation policy?"))
        .await
        .unwrap();

    assert!(response.answer.contains("don't know"));
    assert!(!response.answer.is_empty());
    assert!(response.context.is_empty());
}

#[tokio::test]
async fn unreachable_store_fails_the_query() {
    let engine = RagEngine::new(
        Arc::new(UnreachableStore),
        Arc::new(ScriptedLlm::new()),
        RagConfig::default(),
    );

    // Index build needs the snapshot and must fail loudly.
    assert!(matches!(
        engine.build_index().await,
        Err(Error::Retrieval(_))
    ));

    // A query must fail too, never fall back to an empty evidence set.
    let err = engine
        .invoke(QueryRequest::new("anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Retrieval(_)));

    // The store's own error passes through unwrapped.
    assert_eq!(err.to_string().matches("Retrieval failed").count(), 1);
}

#[tokio::test]
async fn generation_failure_propagates() {
    let (engine, _) = engine_with(corpus(), Arc::new(FailingLlm)).await;

    assert!(matches!(
        engine.invoke(QueryRequest::new("vacation days?")).await,
        Err(Error::Generation(_))
    ));
}

#[tokio::test]
async fn empty_completion_is_a_generation_error() {
    let (engine, _) = engine_with(corpus(), Arc::new(EmptyLlm)).await;

    assert!(matches!(
        engine.invoke(QueryRequest::new("vacation days?")).await,
        Err(Error::Generation(_))
    ));
}

#[tokio::test]
async fn image_summary_evidence_reaches_the_model_as_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("revenue-p7.png");
    let mut file = std::fs::File::create(&image_path).unwrap();
    file.write_all(b"\x89PNG fake").unwrap();

    let mut units = corpus();
    units.push(EvidenceUnit::image_summary(
        "Bar chart showing vacation day accrual rising with employee tenure.",
        "handbook.pdf",
        Some(7),
        &image_path,
    ));

    let llm = Arc::new(ScriptedLlm::new());
    let (engine, _) = engine_with(units, llm.clone()).await;

    let response = engine
        .invoke(QueryRequest::new(
            "How does vacation day accrual change with tenure?",
        ))
        .await
        .unwrap();

    assert!(response
        .context
        .iter()
        .any(|u| u.attachment_path.is_some()));
    assert_eq!(*llm.last_attachment_count.lock().unwrap(), Some(1));
}

#[tokio::test]
async fn rebuild_picks_up_new_units_atomically() {
    let (engine, store) = engine_with(corpus(), Arc::new(ScriptedLlm::new())).await;
    assert_eq!(engine.indexed_units(), 3);

    store
        .add_units(&[EvidenceUnit::text(
            "Remote work requires a signed home-office agreement.",
            "remote.pdf",
            Some(1),
        )])
        .await
        .unwrap();

    // Old index stays live until the rebuild completes.
    assert_eq!(engine.indexed_units(), 3);
    engine.build_index().await.unwrap();
    assert_eq!(engine.indexed_units(), 4);
}
