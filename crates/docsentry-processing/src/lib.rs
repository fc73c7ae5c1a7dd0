//! docsentry processing library
//!
//! Validation, threat scanning and text extraction for untrusted PDF and
//! Word uploads. Nothing here touches the network or the filesystem; every
//! operation works on an in-memory buffer.

pub mod extract;
pub mod pipeline;
pub mod sanitize;
pub mod scanner;
pub mod signature;
pub mod stats;
pub mod validator;

pub use extract::{extractor_for, DocxExtractor, LegacyDocExtractor, PdfExtractor, TextExtractor};
pub use pipeline::{IngestPipeline, NoOpObserver, Stage, StageObserver};
pub use sanitize::sanitize_filename;
pub use scanner::{
    scanner_for, ContainerThreatScanner, PdfThreatScanner, ScanError, ScanLimits, ThreatScanner,
};
pub use signature::verify_signature;
pub use stats::TextStats;
pub use validator::UploadValidator;
