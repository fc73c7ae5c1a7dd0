//! Text extractors, one per document kind.
//!
//! Extractors run only after the threat scan accepted the buffer. Failures
//! are reported as `anyhow` errors and wrapped into
//! `IngestError::ExtractionFailure` by the pipeline.

mod docx;
mod legacy;
mod pdf;

pub use docx::DocxExtractor;
pub use legacy::LegacyDocExtractor;
pub use pdf::PdfExtractor;

use docsentry_core::{DocumentKind, IngestConfig};

pub trait TextExtractor: Send + Sync {
    fn kind(&self) -> DocumentKind;

    /// Extract plain text. May return blank text; the caller decides whether
    /// that is acceptable.
    fn extract(&self, content: &[u8]) -> anyhow::Result<String>;
}

pub fn extractor_for(kind: DocumentKind, config: &IngestConfig) -> Box<dyn TextExtractor> {
    match kind {
        DocumentKind::Pdf => Box::new(PdfExtractor),
        DocumentKind::Docx => Box::new(DocxExtractor::new(config.max_member_bytes)),
        DocumentKind::Doc => Box::new(LegacyDocExtractor::new(config.max_member_bytes)),
    }
}
