//! Legacy Word 97-2003 (`.doc`) text extraction.
//!
//! Reads the piece table out of the OLE2 compound file. Only the main
//! document story is returned; headers, footnotes and comments that follow
//! it in the character stream are cut off at `ccpText`.

use std::io::{Cursor, Read};

use anyhow::{anyhow, bail, Context};
use cfb::CompoundFile;
use docsentry_core::DocumentKind;
use encoding_rs::WINDOWS_1252;

use super::TextExtractor;

const WORD_STREAM: &str = "WordDocument";
const FIB_MAGIC: u16 = 0xA5EC;
const FIB_FLAGS_OFFSET: usize = 0x0A;
const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE: u16 = 0x0200;
const FIB_RGW_OFFSET: usize = 0x20;
/// Index of ccpText in FibRgLw97
const CCP_TEXT_INDEX: usize = 3;
/// Index of fcClx/lcbClx in FibRgFcLcb97
const CLX_INDEX: usize = 33;

const CLXT_PRC: u8 = 0x01;
const CLXT_PCDT: u8 = 0x02;
const PCD_SIZE: usize = 8;
const FC_COMPRESSED: u32 = 0x4000_0000;

#[derive(Debug, Clone, Copy)]
pub struct LegacyDocExtractor {
    max_stream_bytes: usize,
}

impl LegacyDocExtractor {
    pub fn new(max_stream_bytes: usize) -> Self {
        Self { max_stream_bytes }
    }
}

impl TextExtractor for LegacyDocExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Doc
    }

    fn extract(&self, content: &[u8]) -> anyhow::Result<String> {
        let mut compound =
            CompoundFile::open(Cursor::new(content)).context("Failed to open OLE2 compound file")?;

        let word_stream = read_stream(&mut compound, WORD_STREAM, self.max_stream_bytes)?;
        let fib = Fib::parse(&word_stream)?;
        if fib.encrypted {
            bail!("Document is encrypted");
        }

        let table_stream =
            read_stream(&mut compound, fib.table_stream_name(), self.max_stream_bytes)?;
        let pieces = parse_piece_table(&table_stream, fib.fc_clx, fib.lcb_clx)?;
        let raw = decode_pieces(&word_stream, &pieces, fib.ccp_text)?;

        tracing::debug!(
            pieces = pieces.len(),
            ccp_text = fib.ccp_text,
            "Decoded Word piece table"
        );
        Ok(normalize_word_text(&raw))
    }
}

/// Read a whole stream through a `take` limit.
fn read_stream<F: Read + std::io::Seek>(
    compound: &mut CompoundFile<F>,
    name: &str,
    limit: usize,
) -> anyhow::Result<Vec<u8>> {
    let stream = compound
        .open_stream(name)
        .with_context(|| format!("Missing {} stream", name))?;
    let mut data = Vec::new();
    stream
        .take(limit as u64 + 1)
        .read_to_end(&mut data)
        .with_context(|| format!("Failed to read {} stream", name))?;
    if data.len() > limit {
        bail!("{} stream exceeds {} bytes", name, limit);
    }
    Ok(data)
}

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// The fields of the File Information Block needed to find the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fib {
    encrypted: bool,
    use_table1: bool,
    ccp_text: u32,
    fc_clx: u32,
    lcb_clx: u32,
}

impl Fib {
    fn parse(word_stream: &[u8]) -> anyhow::Result<Self> {
        let truncated = || anyhow!("WordDocument stream too short for a FIB");

        if read_u16(word_stream, 0).ok_or_else(truncated)? != FIB_MAGIC {
            bail!("WordDocument stream has no FIB signature");
        }
        let flags = read_u16(word_stream, FIB_FLAGS_OFFSET).ok_or_else(truncated)?;

        // FibRgW97, FibRgLw97 and FibRgFcLcb are each prefixed with their count
        let mut pos = FIB_RGW_OFFSET;
        let csw = read_u16(word_stream, pos).ok_or_else(truncated)? as usize;
        pos += 2 + csw * 2;
        let cslw = read_u16(word_stream, pos).ok_or_else(truncated)? as usize;
        let rg_lw = pos + 2;
        pos = rg_lw + cslw * 4;
        let cb_rg_fc_lcb = read_u16(word_stream, pos).ok_or_else(truncated)? as usize;
        let rg_fc_lcb = pos + 2;

        if cslw <= CCP_TEXT_INDEX || cb_rg_fc_lcb <= CLX_INDEX {
            bail!("FIB too old to carry a piece table");
        }

        let ccp_text = read_u32(word_stream, rg_lw + CCP_TEXT_INDEX * 4).ok_or_else(truncated)?;
        let clx = rg_fc_lcb + CLX_INDEX * 8;
        let fc_clx = read_u32(word_stream, clx).ok_or_else(truncated)?;
        let lcb_clx = read_u32(word_stream, clx + 4).ok_or_else(truncated)?;

        Ok(Self {
            encrypted: flags & FLAG_ENCRYPTED != 0,
            use_table1: flags & FLAG_WHICH_TABLE != 0,
            ccp_text,
            fc_clx,
            lcb_clx,
        })
    }

    fn table_stream_name(&self) -> &'static str {
        if self.use_table1 {
            "1Table"
        } else {
            "0Table"
        }
    }
}

/// A run of characters stored contiguously in the WordDocument stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextPiece {
    cp_start: u32,
    cp_end: u32,
    offset: usize,
    compressed: bool,
}

fn parse_piece_table(
    table_stream: &[u8],
    fc_clx: u32,
    lcb_clx: u32,
) -> anyhow::Result<Vec<TextPiece>> {
    let start = fc_clx as usize;
    let end = start
        .checked_add(lcb_clx as usize)
        .filter(|end| *end <= table_stream.len())
        .ok_or_else(|| anyhow!("Clx lies outside the table stream"))?;
    let clx = &table_stream[start..end];

    let mut pos = 0usize;
    // Skip any RgPrc formatting entries that precede the Pcdt
    while clx.get(pos) == Some(&CLXT_PRC) {
        let cb = read_u16(clx, pos + 1).ok_or_else(|| anyhow!("Truncated Prc in Clx"))? as usize;
        pos += 3 + cb;
    }

    if clx.get(pos) != Some(&CLXT_PCDT) {
        bail!("Clx has no piece table");
    }
    let lcb = read_u32(clx, pos + 1).ok_or_else(|| anyhow!("Truncated Pcdt"))? as usize;
    let plc = clx
        .get(pos + 5..pos + 5 + lcb)
        .ok_or_else(|| anyhow!("PlcPcd exceeds Clx"))?;

    if lcb < 4 {
        bail!("Empty piece table");
    }
    let count = (lcb - 4) / (4 + PCD_SIZE);
    let pcds = (count + 1) * 4;

    let cps = (0..=count)
        .map(|i| read_u32(plc, i * 4))
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(|| anyhow!("Truncated piece table"))?;
    // Pieces partition the character stream; repeated positions would decode
    // the same bytes more than once
    if cps.windows(2).any(|w| w[0] >= w[1]) {
        bail!("Piece table character positions are not strictly increasing");
    }

    let mut pieces = Vec::with_capacity(count);
    for i in 0..count {
        let fc = read_u32(plc, pcds + i * PCD_SIZE + 2)
            .ok_or_else(|| anyhow!("Truncated piece descriptor {}", i))?;

        let compressed = fc & FC_COMPRESSED != 0;
        let offset = if compressed {
            ((fc & !FC_COMPRESSED) / 2) as usize
        } else {
            fc as usize
        };
        pieces.push(TextPiece {
            cp_start: cps[i],
            cp_end: cps[i + 1],
            offset,
            compressed,
        });
    }

    Ok(pieces)
}

/// Decode pieces in order, stopping after `ccp_text` characters.
///
/// Every stored character occupies at least one byte of the WordDocument
/// stream, so decoding more characters than the stream has bytes means the
/// pieces point at the same bytes repeatedly.
fn decode_pieces(
    word_stream: &[u8],
    pieces: &[TextPiece],
    ccp_text: u32,
) -> anyhow::Result<String> {
    let covered = pieces.last().map(|p| p.cp_end).unwrap_or(0);
    let ccp_text = ccp_text.min(covered);
    let mut decoded = 0usize;
    let mut out = String::new();

    for piece in pieces {
        if piece.cp_start >= ccp_text {
            break;
        }
        let cp_end = piece.cp_end.min(ccp_text);
        if cp_end <= piece.cp_start {
            continue;
        }
        let chars = (cp_end - piece.cp_start) as usize;
        let bytes = if piece.compressed { chars } else { chars * 2 };

        let Some(slice) = word_stream.get(piece.offset..piece.offset + bytes) else {
            tracing::warn!(
                offset = piece.offset,
                len = bytes,
                "Text piece outside WordDocument stream"
            );
            continue;
        };

        decoded += chars;
        if decoded > word_stream.len() {
            bail!(
                "Piece table decodes more than {} characters",
                word_stream.len()
            );
        }

        if piece.compressed {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(slice);
            out.push_str(&text);
        } else {
            let units: Vec<u16> = slice
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect();
            out.push_str(&String::from_utf16_lossy(&units));
        }
    }

    Ok(out)
}

/// Map Word's in-band control characters to plain text and drop blank lines.
fn normalize_word_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            // paragraph, cell/row end, manual line break, page/section break
            '\r' | '\u{07}' | '\u{0B}' | '\u{0C}' => text.push('\n'),
            // field begin/separator/end
            '\u{13}' | '\u{14}' | '\u{15}' => {}
            '\t' | '\n' => text.push(c),
            c if c.is_control() => {}
            c => text.push(c),
        }
    }

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
