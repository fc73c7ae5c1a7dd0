//! Text statistics reported with each extracted file.

/// Character, word and line counts of extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.matches('\n').count() + 1,
        }
    }
}

/// Size in KiB rounded to two decimals.
pub fn size_kb(size_bytes: usize) -> f64 {
    (size_bytes as f64 / 1024.0 * 100.0).round() / 100.0
}
