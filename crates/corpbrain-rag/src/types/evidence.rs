//! Evidence units: the atomic retrievable items backing every answer

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Kind of evidence a unit carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// Raw text chunk from a source document
    Text,
    /// Generated description standing in for a non-text page region
    ImageSummary,
}

/// One retrievable piece of grounding material
///
/// Units are created during ingestion and immutable afterwards; the engine
/// only reads them. `attachment_path` is present if and only if the unit is
/// an image summary; the constructors are the only way to build a unit, so
/// the invariant holds everywhere downstream. The referenced image resource
/// is owned by ingestion; the engine never mutates or deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceUnit {
    /// Unique unit ID
    pub id: Uuid,
    /// Text to embed and match (chunk text or image description)
    pub content: String,
    /// Origin document identifier
    pub source: String,
    /// Page number in the origin document, when known
    pub page: Option<u32>,
    /// What this unit stands for
    pub kind: EvidenceKind,
    /// Rendered image resource backing an image summary
    pub attachment_path: Option<PathBuf>,
}

impl EvidenceUnit {
    /// Create a text evidence unit
    pub fn text(content: impl Into<String>, source: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source: source.into(),
            page,
            kind: EvidenceKind::Text,
            attachment_path: None,
        }
    }

    /// Create an image-summary evidence unit backed by a rendered image
    pub fn image_summary(
        content: impl Into<String>,
        source: impl Into<String>,
        page: Option<u32>,
        attachment_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            source: source.into(),
            page,
            kind: EvidenceKind::ImageSummary,
            attachment_path: Some(attachment_path.into()),
        }
    }

    /// Duplicate-identity key: two units are the same evidence iff their
    /// `(source, page, kind)` match
    pub fn key(&self) -> EvidenceKey {
        EvidenceKey {
            source: self.source.clone(),
            page: self.page,
            kind: self.kind,
        }
    }

    /// Human-readable source label for context blocks and citations
    pub fn source_label(&self) -> String {
        match self.page {
            Some(page) => format!("{}, page {}", self.source, page),
            None => self.source.clone(),
        }
    }
}

/// Duplicate-identity key for evidence units
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvidenceKey {
    pub source: String,
    pub page: Option<u32>,
    pub kind: EvidenceKind,
}

/// An evidence unit paired with a retrieval score
///
/// Score semantics are private to the producing index: dense cosine
/// similarity and lexical term statistics are not comparable in absolute
/// terms. Only rank position is portable across indices, which is why fusion
/// operates on ranks rather than raw scores.
#[derive(Debug, Clone)]
pub struct ScoredUnit {
    /// The retrieved unit
    pub unit: EvidenceUnit,
    /// Index-private relevance score (higher is better)
    pub score: f32,
}
