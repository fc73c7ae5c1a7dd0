use docsentry_core::{ThreatFinding, ThreatKind};

use super::patterns::first_pdf_match;
use super::{ScanError, ThreatScanner};

/// Raw byte scan for script and action markers.
///
/// The buffer is not parsed: markers inside compressed streams are not seen,
/// but neither can a malformed object table make the scanner skip anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfThreatScanner;

impl PdfThreatScanner {
    pub fn new() -> Self {
        Self
    }
}

impl ThreatScanner for PdfThreatScanner {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn scan(&self, content: &[u8]) -> Result<(), ScanError> {
        match first_pdf_match(content) {
            Some(label) => {
                Err(ThreatFinding::new(ThreatKind::ScriptOrAction).with_pattern(label).into())
            }
            None => Ok(()),
        }
    }
}
