//! Static threat pattern tables.
//!
//! Tables are data, compiled once into case-insensitive regexes. Each entry
//! carries a label used for logging; labels never reach the client.

use std::sync::LazyLock;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;

/// A named pattern compiled on first use.
pub struct Pattern<R> {
    pub label: &'static str,
    pub regex: R,
}

/// Markers for active content in a raw PDF buffer.
///
/// `/JS` and `/AA` are matched as whole tokens, otherwise names like
/// `/JSON` or `/Aardvark` would trip them.
const PDF_DANGEROUS_TOKENS: &[(&str, &str)] = &[
    ("/JavaScript", r"/javascript"),
    ("/JS", r"/js(?-u:\b)"),
    ("/AA", r"/aa(?-u:\b)"),
    ("/OpenAction", r"/openaction"),
    ("/Launch", r"/launch"),
    ("/EmbeddedFile", r"/embeddedfile"),
    ("/RichMedia", r"/richmedia"),
    ("/XFA", r"/xfa"),
    ("eval(", r"eval\s*\("),
    ("<script", r"<script"),
];

/// Markers for scripts, embedded objects and macro wiring in OOXML parts.
const XML_DANGEROUS_PATTERNS: &[(&str, &str)] = &[
    ("<script", r"<script"),
    ("javascript:", r"javascript:"),
    ("vbscript:", r"vbscript:"),
    ("event handler", r"\son[a-z]{2,}\s*="),
    // Unprefixed only: `<w:object>` is ordinary OLE wiring in WordprocessingML
    ("<object", r"<object"),
    ("<embed", r"<embed"),
    ("<iframe", r"<iframe"),
    ("macroEnabled", r"macroenabled"),
    ("w:macros", r"w:macros"),
];

/// Archive member extensions that are never legitimate inside a document.
pub const DENIED_MEMBER_EXTENSIONS: &[&str] =
    &["exe", "bat", "cmd", "ps1", "vbs", "js", "jar", "sh"];

/// Parts whose contents are inspected for active content.
pub const INSPECTED_XML_MEMBERS: &[&str] = &[
    "word/document.xml",
    "word/settings.xml",
    "word/webSettings.xml",
    "[Content_Types].xml",
    "_rels/.rels",
];

pub const MACRO_MEMBER_PREFIX: &str = "word/vba";
pub const MACRO_MEMBER_SUFFIX: &str = ".bin";

pub static PDF_PATTERNS: LazyLock<Vec<Pattern<BytesRegex>>> = LazyLock::new(|| {
    PDF_DANGEROUS_TOKENS
        .iter()
        .map(|&(label, pattern)| Pattern {
            label,
            // Raw buffers are not UTF-8; match bytes with ASCII-only case folding
            regex: BytesRegex::new(&format!("(?i-u){}", pattern))
                .unwrap_or_else(|e| panic!("invalid PDF pattern {}: {}", label, e)),
        })
        .collect()
});

pub static XML_PATTERNS: LazyLock<Vec<Pattern<Regex>>> = LazyLock::new(|| {
    XML_DANGEROUS_PATTERNS
        .iter()
        .map(|&(label, pattern)| Pattern {
            label,
            regex: Regex::new(&format!("(?i){}", pattern))
                .unwrap_or_else(|e| panic!("invalid XML pattern {}: {}", label, e)),
        })
        .collect()
});

/// First PDF pattern that matches `content`, in table order.
pub fn first_pdf_match(content: &[u8]) -> Option<&'static str> {
    PDF_PATTERNS
        .iter()
        .find(|p| p.regex.is_match(content))
        .map(|p| p.label)
}

/// First XML pattern that matches `text`, in table order.
pub fn first_xml_match(text: &str) -> Option<&'static str> {
    XML_PATTERNS
        .iter()
        .find(|p| p.regex.is_match(text))
        .map(|p| p.label)
}

/// Whether an archive member name carries a denied executable extension.
pub fn is_denied_member(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            DENIED_MEMBER_EXTENSIONS
                .iter()
                .any(|denied| ext.eq_ignore_ascii_case(denied))
        })
        .unwrap_or(false)
}

/// Whether an archive member looks like VBA project storage.
pub fn is_macro_member(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with(MACRO_MEMBER_PREFIX) || lower.ends_with(MACRO_MEMBER_SUFFIX)
}
