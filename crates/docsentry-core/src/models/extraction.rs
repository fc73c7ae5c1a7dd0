use serde::Serialize;

use super::upload::{DocumentKind, SanitizedName};

/// Per-file metadata record returned alongside extracted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    /// Sanitized display name.
    pub filename: SanitizedName,
    /// Name exactly as supplied by the caller. Never use it for paths.
    pub original_filename: String,
    pub extension: DocumentKind,
    pub size_bytes: usize,
    /// Size in KiB, rounded to two decimals.
    pub size_kb: f64,
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

/// Successful outcome of ingesting a single file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// Trimmed, non-empty extracted text.
    pub text: String,
    pub metadata: FileMetadata,
}

/// Successful outcome of ingesting a batch. Results are in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub results: Vec<ExtractionResult>,
    pub combined_text: String,
    pub total_files: usize,
    pub total_words: usize,
    pub total_characters: usize,
}

/// Wire shape of a batch: combined text, per-file metadata and totals.
#[derive(Debug, Serialize)]
pub struct BatchResponse<'a> {
    pub text: &'a str,
    pub files: Vec<&'a FileMetadata>,
    pub total_files: usize,
    pub total_words: usize,
    pub total_characters: usize,
}

impl BatchResult {
    pub fn files(&self) -> impl Iterator<Item = &FileMetadata> {
        self.results.iter().map(|r| &r.metadata)
    }

    pub fn response(&self) -> BatchResponse<'_> {
        BatchResponse {
            text: &self.combined_text,
            files: self.files().collect(),
            total_files: self.total_files,
            total_words: self.total_words,
            total_characters: self.total_characters,
        }
    }
}

/// Builds a [`BatchResult`] one file at a time.
///
/// Each file is processed independently; only the accumulator sees more than
/// one result, and it is fed in input order.
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    sections: Vec<String>,
    results: Vec<ExtractionResult>,
    total_words: usize,
    total_characters: usize,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sections: Vec::with_capacity(capacity),
            results: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn push(&mut self, result: ExtractionResult) {
        self.sections.push(format!(
            "=== {} ===\n{}",
            result.metadata.filename, result.text
        ));
        self.total_words += result.metadata.words;
        self.total_characters += result.metadata.characters;
        self.results.push(result);
    }

    pub fn finish(self) -> BatchResult {
        BatchResult {
            total_files: self.results.len(),
            combined_text: self.sections.join("\n\n"),
            results: self.results,
            total_words: self.total_words,
            total_characters: self.total_characters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, text: &str, words: usize) -> ExtractionResult {
        ExtractionResult {
            text: text.to_string(),
            metadata: FileMetadata {
                filename: SanitizedName::from_sanitized(name.to_string()),
                original_filename: name.to_string(),
                extension: DocumentKind::Pdf,
                size_bytes: 2048,
                size_kb: 2.0,
                characters: text.chars().count(),
                words,
                lines: 1,
            },
        }
    }

    #[test]
    fn test_accumulator_sums_and_orders() {
        let mut acc = BatchAccumulator::new();
        acc.push(result("a.pdf", "one two", 2));
        acc.push(result("b.pdf", "three", 1));
        let batch = acc.finish();

        assert_eq!(batch.total_files, 2);
        assert_eq!(batch.total_words, 3);
        assert_eq!(batch.total_characters, 12);
        let names: Vec<_> = batch.files().map(|m| m.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
        assert_eq!(
            batch.combined_text,
            "=== a.pdf ===\none two\n\n=== b.pdf ===\nthree"
        );
    }

    #[test]
    fn test_empty_accumulator() {
        let batch = BatchAccumulator::new().finish();
        assert_eq!(batch, BatchResult::default());
    }

    #[test]
    fn test_response_shape() {
        let mut acc = BatchAccumulator::new();
        acc.push(result("a.pdf", "hello", 1));
        let batch = acc.finish();
        let json = serde_json::to_value(batch.response()).unwrap();

        assert_eq!(json["text"], "=== a.pdf ===\nhello");
        assert_eq!(json["total_files"], 1);
        assert_eq!(json["files"][0]["filename"], "a.pdf");
        assert_eq!(json["files"][0]["extension"], "pdf");
    }
}
