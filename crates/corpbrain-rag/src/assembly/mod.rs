//! Evidence assembly: partition fused evidence into a textual context block
//! and deduplicated visual attachments

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::types::{EvidenceKind, EvidenceUnit};

/// A decoded visual attachment ready to embed in a generation request
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// MIME type (e.g. `image/png`)
    pub mime: String,
}

/// Output of assembly: the textual context plus the images backing it
#[derive(Debug, Clone, Default)]
pub struct AssembledEvidence {
    /// Source-labelled unit contents in fused order, blank-line separated
    pub text_block: String,
    /// Resolved image attachments, deduplicated by path
    pub attachments: Vec<Attachment>,
}

/// Assembles fused evidence into generator input
///
/// Every unit contributes its content to the text block: an image summary
/// stands in for its region, so its text is context even when the image
/// itself cannot be loaded. Fused order is preserved because it implicitly
/// signals relevance rank to the generator.
#[derive(Debug, Clone, Default)]
pub struct EvidenceAssembler;

impl EvidenceAssembler {
    /// Create a new assembler
    pub fn new() -> Self {
        Self
    }

    /// Assemble fused evidence into a text block and attachment list
    ///
    /// A missing or unreadable attachment degrades gracefully: the image is
    /// dropped with a warning and the unit's summary text stays in the block.
    /// The same image is never attached twice, even when several fused units
    /// reference it.
    pub async fn assemble(&self, fused: &[EvidenceUnit]) -> AssembledEvidence {
        let mut sections = Vec::with_capacity(fused.len());
        let mut attachments = Vec::new();
        let mut seen_paths: HashSet<PathBuf> = HashSet::new();

        for (i, unit) in fused.iter().enumerate() {
            sections.push(format!(
                "[{}] {}\n{}",
                i + 1,
                unit.source_label(),
                unit.content
            ));

            if unit.kind != EvidenceKind::ImageSummary {
                continue;
            }
            let Some(path) = unit.attachment_path.as_ref() else {
                continue;
            };

            let resolved = resolve_path(path);
            if !seen_paths.insert(resolved) {
                continue;
            }

            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    attachments.push(Attachment {
                        bytes,
                        mime: mime_for_path(path),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Dropping attachment {} for {}: {}",
                        path.display(),
                        unit.source_label(),
                        e
                    );
                }
            }
        }

        AssembledEvidence {
            text_block: sections.join("\n\n"),
            attachments,
        }
    }
}

/// Resolve a path for deduplication purposes
///
/// Canonicalization collapses aliases of the same file; a path that cannot be
/// canonicalized (e.g. it no longer exists) deduplicates by its literal form.
fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Guess the attachment MIME type from the file extension
fn mime_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "image/png".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_png(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let assembled = EvidenceAssembler::new().assemble(&[]).await;
        assert!(assembled.text_block.is_empty());
        assert!(assembled.attachments.is_empty());
    }

    #[tokio::test]
    async fn text_block_preserves_order_and_labels() {
        let fused = vec![
            EvidenceUnit::text("vacation policy details", "handbook.pdf", Some(4)),
            EvidenceUnit::text("travel reimbursement rules", "expenses.pdf", None),
        ];
        let assembled = EvidenceAssembler::new().assemble(&fused).await;

        let first = assembled.text_block.find("handbook.pdf, page 4").unwrap();
        let second = assembled.text_block.find("expenses.pdf").unwrap();
        assert!(first < second);
        assert!(assembled.text_block.contains("[1]"));
        assert!(assembled.text_block.contains("[2]"));
        assert!(assembled.text_block.contains("vacation policy details"));
        assert!(assembled.attachments.is_empty());
    }

    #[tokio::test]
    async fn image_summary_yields_exactly_one_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "chart.png", b"\x89PNG fake bytes");

        let fused = vec![EvidenceUnit::image_summary(
            "bar chart of quarterly revenue",
            "report.pdf",
            Some(7),
            &path,
        )];
        let assembled = EvidenceAssembler::new().assemble(&fused).await;

        assert_eq!(assembled.attachments.len(), 1);
        assert_eq!(assembled.attachments[0].mime, "image/png");
        assert_eq!(assembled.attachments[0].bytes, b"\x89PNG fake bytes");
        assert!(assembled.text_block.contains("bar chart of quarterly revenue"));
    }

    #[tokio::test]
    async fn same_attachment_referenced_twice_is_sent_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "diagram.png", b"bytes");

        let fused = vec![
            EvidenceUnit::image_summary("diagram, first mention", "design.pdf", Some(1), &path),
            EvidenceUnit::image_summary("diagram, second mention", "design.pdf", Some(2), &path),
        ];
        let assembled = EvidenceAssembler::new().assemble(&fused).await;

        assert_eq!(assembled.attachments.len(), 1);
        assert!(assembled.text_block.contains("first mention"));
        assert!(assembled.text_block.contains("second mention"));
    }

    #[tokio::test]
    async fn missing_attachment_keeps_summary_text() {
        let fused = vec![
            EvidenceUnit::image_summary(
                "diagram of the org structure",
                "org.pdf",
                Some(2),
                "/nonexistent/org-p2.png",
            ),
            EvidenceUnit::text("the org has three departments", "org.pdf", Some(3)),
        ];
        let assembled = EvidenceAssembler::new().assemble(&fused).await;

        assert!(assembled.attachments.is_empty());
        assert!(assembled.text_block.contains("diagram of the org structure"));
        assert!(assembled.text_block.contains("three departments"));
    }
}
