use std::panic::{self, AssertUnwindSafe};

use anyhow::anyhow;
use docsentry_core::DocumentKind;

use super::TextExtractor;

/// Page-by-page PDF text extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

/// `pdf-extract` panics on some malformed inputs instead of returning an
/// error, so the call sits behind an unwind boundary.
fn extract_pages(content: &[u8]) -> anyhow::Result<Vec<String>> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(content)
    }));

    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(anyhow!("PDF parse error: {}", e)),
        Err(_) => Err(anyhow!("PDF parser panicked on malformed document")),
    }
}

impl TextExtractor for PdfExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn extract(&self, content: &[u8]) -> anyhow::Result<String> {
        let pages = extract_pages(content)?;
        let page_count = pages.len();

        let text = pages
            .into_iter()
            .map(|page| page.trim().to_string())
            .filter(|page| !page.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::debug!(pages = page_count, characters = text.len(), "Extracted PDF text");
        Ok(text)
    }
}
