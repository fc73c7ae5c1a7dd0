//! Error types module
//!
//! Every stage of the ingestion pipeline either succeeds or returns one of the
//! terminal rejections in [`IngestError`]. Rejections are never transient, so
//! there is no retry inside the pipeline.
//!
//! The `Display` text of an error carries locating detail (matched pattern
//! label, archive member) and is meant for logs. Untrusted callers should only
//! ever see [`ErrorMetadata::client_message`].

use crate::models::{DocumentKind, ThreatFinding, ThreatKind};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - malformed or mislabelled uploads
    Debug,
    /// Warning level - security rejections worth auditing
    Warn,
    /// Error level - failures that may indicate a bug on our side
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code the caller should map this error to
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "SIGNATURE_MISMATCH")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same upload could succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message. Never includes matched patterns or member names.
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the caller
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Unsupported file extension {extension:?} (allowed: {allowed:?})")]
    UnsupportedExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    OversizedFile { size: usize, max: usize },

    #[error("File signature does not match declared extension .{extension}")]
    SignatureMismatch { extension: String },

    #[error("No file signature registered for extension .{extension}")]
    SignatureNotRegistered { extension: String },

    #[error("Executable archive member: {member}")]
    EmbeddedExecutable { member: String },

    #[error("PDF script or action marker: {pattern}")]
    ScriptOrAction { pattern: String },

    #[error("Active content in {member}: {pattern}")]
    ScriptOrMacroDetected { member: String, pattern: String },

    #[error("Macro storage member: {member}")]
    MacroDetected { member: String },

    #[error("Archive member {member} exceeds the inspection limit")]
    ContainerTooLarge { member: String },

    #[error("Corrupt container: {0}")]
    CorruptContainer(String),

    #[error("No extractable text")]
    NoExtractableText,

    #[error("{format} text extraction failed")]
    ExtractionFailure {
        format: DocumentKind,
        #[source]
        source: anyhow::Error,
    },

    /// A worker running one file of a concurrent batch did not complete
    #[error("Ingestion task failed: {0}")]
    TaskFailed(String),
}

impl IngestError {
    pub fn extraction(format: DocumentKind, source: impl Into<anyhow::Error>) -> Self {
        IngestError::ExtractionFailure {
            format,
            source: source.into(),
        }
    }

    /// Get the error type name for logs and detailed responses
    pub fn error_type(&self) -> &'static str {
        match self {
            IngestError::UnsupportedExtension { .. } => "UnsupportedExtension",
            IngestError::EmptyFile => "EmptyFile",
            IngestError::OversizedFile { .. } => "OversizedFile",
            IngestError::SignatureMismatch { .. } => "SignatureMismatch",
            IngestError::SignatureNotRegistered { .. } => "SignatureNotRegistered",
            IngestError::EmbeddedExecutable { .. } => "EmbeddedExecutable",
            IngestError::ScriptOrAction { .. } => "ScriptOrAction",
            IngestError::ScriptOrMacroDetected { .. } => "ScriptOrMacroDetected",
            IngestError::MacroDetected { .. } => "MacroDetected",
            IngestError::ContainerTooLarge { .. } => "ContainerTooLarge",
            IngestError::CorruptContainer(_) => "CorruptContainer",
            IngestError::NoExtractableText => "NoExtractableText",
            IngestError::ExtractionFailure { .. } => "ExtractionFailure",
            IngestError::TaskFailed(_) => "TaskFailed",
        }
    }

    /// Whether this rejection came from a threat scanner.
    pub fn is_threat(&self) -> bool {
        matches!(
            self,
            IngestError::EmbeddedExecutable { .. }
                | IngestError::ScriptOrAction { .. }
                | IngestError::ScriptOrMacroDetected { .. }
                | IngestError::MacroDetected { .. }
                | IngestError::ContainerTooLarge { .. }
        )
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl From<ThreatFinding> for IngestError {
    fn from(finding: ThreatFinding) -> Self {
        let member = finding.member.unwrap_or_default();
        let pattern = finding.pattern.unwrap_or_default();
        match finding.kind {
            ThreatKind::EmbeddedExecutable => IngestError::EmbeddedExecutable { member },
            ThreatKind::ScriptOrAction => IngestError::ScriptOrAction { pattern },
            ThreatKind::ScriptOrMacro => IngestError::ScriptOrMacroDetected { member, pattern },
            ThreatKind::Macro => IngestError::MacroDetected { member },
            ThreatKind::ExcessiveExpansion => IngestError::ContainerTooLarge { member },
        }
    }
}

/// Static metadata for each variant:
/// (http_status, error_code, suggested_action, sensitive, log_level).
fn ingest_error_static_metadata(
    err: &IngestError,
) -> (u16, &'static str, Option<&'static str>, bool, LogLevel) {
    match err {
        IngestError::UnsupportedExtension { .. } => (
            400,
            "UNSUPPORTED_EXTENSION",
            Some("Upload a PDF (.pdf) or Word (.docx, .doc) document"),
            false,
            LogLevel::Debug,
        ),
        IngestError::EmptyFile => (
            400,
            "EMPTY_FILE",
            Some("Check that the file was fully uploaded"),
            false,
            LogLevel::Debug,
        ),
        IngestError::OversizedFile { .. } => (
            413,
            "FILE_TOO_LARGE",
            Some("Reduce file size or split the document"),
            false,
            LogLevel::Debug,
        ),
        IngestError::SignatureMismatch { .. } => (
            400,
            "SIGNATURE_MISMATCH",
            Some("Make sure the file extension matches the real file type"),
            false,
            LogLevel::Warn,
        ),
        IngestError::SignatureNotRegistered { .. } => (
            500,
            "SIGNATURE_NOT_REGISTERED",
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        IngestError::EmbeddedExecutable { .. } => (
            400,
            "EMBEDDED_EXECUTABLE",
            Some("Remove embedded programs from the document"),
            true,
            LogLevel::Warn,
        ),
        IngestError::ScriptOrAction { .. } => (
            400,
            "PDF_ACTIVE_CONTENT",
            Some("Export the document again without scripts, actions or attachments"),
            true,
            LogLevel::Warn,
        ),
        IngestError::ScriptOrMacroDetected { .. } => (
            400,
            "ACTIVE_CONTENT_DETECTED",
            Some("Save the document as a plain .docx without macros or active content"),
            true,
            LogLevel::Warn,
        ),
        IngestError::MacroDetected { .. } => (
            400,
            "MACRO_DETECTED",
            Some("Save the document as a plain .docx without macros"),
            true,
            LogLevel::Warn,
        ),
        IngestError::ContainerTooLarge { .. } => (
            413,
            "CONTAINER_TOO_LARGE",
            Some("Reduce the amount of embedded content"),
            true,
            LogLevel::Warn,
        ),
        IngestError::CorruptContainer(_) => (
            400,
            "CORRUPT_CONTAINER",
            Some("Open and save the document again, then retry"),
            true,
            LogLevel::Debug,
        ),
        IngestError::NoExtractableText => (
            400,
            "NO_EXTRACTABLE_TEXT",
            Some("Scanned or image-only documents are not supported"),
            false,
            LogLevel::Debug,
        ),
        IngestError::ExtractionFailure { .. } => (
            500,
            "EXTRACTION_FAILED",
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        IngestError::TaskFailed(_) => (
            500,
            "INTERNAL_ERROR",
            Some("Retry later or contact support"),
            true,
            LogLevel::Error,
        ),
    }
}

impl ErrorMetadata for IngestError {
    fn http_status_code(&self) -> u16 {
        ingest_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        ingest_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn suggested_action(&self) -> Option<&'static str> {
        ingest_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        ingest_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        ingest_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            IngestError::UnsupportedExtension { allowed, .. } => format!(
                "Unsupported file type. Use: {}",
                allowed.join(", ")
            ),
            IngestError::EmptyFile => "The file is empty".to_string(),
            IngestError::OversizedFile { max, .. } => format!(
                "The file exceeds the maximum size of {} MB",
                max / (1024 * 1024)
            ),
            IngestError::SignatureMismatch { extension } => format!(
                "The file content does not match the .{} extension",
                extension
            ),
            IngestError::SignatureNotRegistered { .. } => {
                "This file type cannot be verified".to_string()
            }
            IngestError::EmbeddedExecutable { .. } => {
                "The document contains embedded executable files".to_string()
            }
            IngestError::ScriptOrAction { .. } => {
                "The PDF contains scripts or automatic actions".to_string()
            }
            IngestError::ScriptOrMacroDetected { .. } => {
                "The document contains scripts, macros or active content".to_string()
            }
            IngestError::MacroDetected { .. } => "The document contains macros".to_string(),
            IngestError::ContainerTooLarge { .. } => {
                "The document expands beyond the allowed size".to_string()
            }
            IngestError::CorruptContainer(_) => {
                "The document is damaged and cannot be opened".to_string()
            }
            IngestError::NoExtractableText => {
                "No text could be extracted. Check that the file contains readable text"
                    .to_string()
            }
            IngestError::ExtractionFailure { format, .. } => {
                format!("The {} document could not be processed", format)
            }
            IngestError::TaskFailed(_) => "An internal error occurred".to_string(),
        }
    }
}
