use std::io::Cursor;

use anyhow::{anyhow, Context};
use docsentry_core::DocumentKind;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::TextExtractor;
use crate::scanner::container::{read_member_bounded, MemberRead};

const DOCUMENT_PART: &str = "word/document.xml";

/// Text extraction for OOXML Word documents.
#[derive(Debug, Clone, Copy)]
pub struct DocxExtractor {
    max_part_bytes: usize,
}

impl DocxExtractor {
    pub fn new(max_part_bytes: usize) -> Self {
        Self { max_part_bytes }
    }
}

impl TextExtractor for DocxExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn extract(&self, content: &[u8]) -> anyhow::Result<String> {
        let mut archive =
            ZipArchive::new(Cursor::new(content)).context("Failed to open Word container")?;

        let xml = match read_member_bounded(&mut archive, DOCUMENT_PART, self.max_part_bytes) {
            MemberRead::Data(data) => data,
            MemberRead::TooLarge => {
                return Err(anyhow!("{} exceeds {} bytes", DOCUMENT_PART, self.max_part_bytes))
            }
            MemberRead::Unreadable(reason) => {
                return Err(anyhow!("Failed to read {}: {}", DOCUMENT_PART, reason))
            }
        };

        let body = parse_document_xml(&String::from_utf8_lossy(&xml))?;
        tracing::debug!(
            paragraphs = body.paragraphs.len(),
            cells = body.cells.len(),
            "Parsed Word document body"
        );

        Ok(body.into_text())
    }
}

/// Non-blank texts collected from a WordprocessingML body.
#[derive(Debug, Default, PartialEq)]
struct DocumentBody {
    /// Paragraphs outside tables, in document order
    paragraphs: Vec<String>,
    /// Table cells in document order, each cell's paragraphs joined by `\n`
    cells: Vec<String>,
}

impl DocumentBody {
    /// Paragraphs first, then table cells.
    fn into_text(self) -> String {
        self.paragraphs
            .into_iter()
            .chain(self.cells)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_document_xml(xml: &str) -> anyhow::Result<DocumentBody> {
    let mut reader = Reader::from_str(xml);
    // Whitespace inside <w:t xml:space="preserve"> is significant
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut body = DocumentBody::default();

    let mut table_depth = 0usize;
    // Text boxes nest paragraphs inside paragraphs
    let mut para_depth = 0usize;
    // Tab stops in paragraph properties also use `w:tab`; only runs emit text
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut paragraph = String::new();
    let mut cell_paragraphs: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    if para_depth == 0 {
                        paragraph.clear();
                    }
                    para_depth += 1;
                }
                b"tbl" => table_depth += 1,
                b"tc" if table_depth == 1 => cell_paragraphs.clear(),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                b"tab" if run_depth > 0 => paragraph.push('\t'),
                b"br" | b"cr" if run_depth > 0 => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if run_depth > 0 => paragraph.push('\t'),
                b"br" | b"cr" if run_depth > 0 => paragraph.push('\n'),
                b"p" if para_depth == 0 && table_depth > 0 => {
                    cell_paragraphs.push(String::new())
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().context("Invalid text in document.xml")?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" => {
                    para_depth = para_depth.saturating_sub(1);
                    if para_depth == 0 {
                        let text = std::mem::take(&mut paragraph);
                        if table_depth > 0 {
                            cell_paragraphs.push(text);
                        } else if !text.trim().is_empty() {
                            body.paragraphs.push(text.trim().to_string());
                        }
                    }
                }
                b"tc" if table_depth == 1 => {
                    let cell = cell_paragraphs.join("\n");
                    if !cell.trim().is_empty() {
                        body.cells.push(cell.trim().to_string());
                    }
                    cell_paragraphs.clear();
                }
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "Malformed document.xml at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(body)
}
