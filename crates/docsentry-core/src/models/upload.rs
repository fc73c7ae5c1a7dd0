use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document formats accepted by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Legacy OLE2 compound document.
    Doc,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [DocumentKind::Pdf, DocumentKind::Docx, DocumentKind::Doc];

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "doc" => Some(DocumentKind::Doc),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Doc => "doc",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A named byte buffer supplied by an untrusted caller.
///
/// The filename is attacker-controlled and is only used to derive the
/// declared extension and, after sanitization, a display name.
#[derive(Clone, Debug)]
pub struct UploadedBlob {
    pub filename: String,
    pub content: Bytes,
}

impl UploadedBlob {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Declared extension: text after the last `.`, lower-cased.
    /// Empty when the filename has no `.`.
    pub fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Filename that has passed through the name sanitizer.
///
/// Holds only `[A-Za-z0-9 ._-]`, never contains `..` or path separators,
/// is at most [`SanitizedName::MAX_LEN`] characters and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub const MAX_LEN: usize = 200;
    pub const PLACEHOLDER: &'static str = "unnamed_file";

    /// Wrap an already-sanitized value. Callers outside the sanitizer should
    /// not need this; it exists so the sanitizer can live in another crate.
    pub fn from_sanitized(value: String) -> Self {
        debug_assert!(!value.is_empty());
        debug_assert!(value.chars().count() <= Self::MAX_LEN);
        Self(value)
    }

    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
