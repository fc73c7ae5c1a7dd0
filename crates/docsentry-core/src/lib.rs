//! docsentry core library
//!
//! Domain models, error types and configuration shared by the ingestion
//! pipeline and its front ends.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::IngestConfig;
pub use error::{ErrorMetadata, IngestError, LogLevel};
pub use models::{
    BatchAccumulator, BatchResponse, BatchResult, DocumentKind, ExtractionResult, FileMetadata,
    SanitizedName, ThreatFinding, ThreatKind, UploadedBlob,
};
