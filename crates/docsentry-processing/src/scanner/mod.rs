//! Format-specific threat scanners.
//!
//! Scanners only look at bytes that already passed the signature check. They
//! never execute or render anything; a finding is a terminal rejection.

pub mod container;
pub mod patterns;
pub mod pdf;

use docsentry_core::{DocumentKind, IngestConfig, IngestError, ThreatFinding};

pub use container::{ContainerThreatScanner, ScanLimits};
pub use pdf::PdfThreatScanner;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Threat detected: {0}")]
    Threat(ThreatFinding),

    #[error("Corrupt container: {0}")]
    CorruptContainer(String),
}

impl From<ThreatFinding> for ScanError {
    fn from(finding: ThreatFinding) -> Self {
        ScanError::Threat(finding)
    }
}

impl From<ScanError> for IngestError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Threat(finding) => finding.into(),
            ScanError::CorruptContainer(reason) => IngestError::CorruptContainer(reason),
        }
    }
}

pub trait ThreatScanner: Send + Sync {
    /// Scanner name for logs
    fn name(&self) -> &'static str;

    fn scan(&self, content: &[u8]) -> Result<(), ScanError>;
}

/// Scanner for a document kind. Legacy `.doc` has none: OLE2 streams are not
/// inspected, only the signature is verified.
pub fn scanner_for(kind: DocumentKind, config: &IngestConfig) -> Option<Box<dyn ThreatScanner>> {
    match kind {
        DocumentKind::Pdf => Some(Box::new(PdfThreatScanner::new())),
        DocumentKind::Docx => Some(Box::new(ContainerThreatScanner::new(
            ScanLimits::from_config(config),
        ))),
        DocumentKind::Doc => None,
    }
}
