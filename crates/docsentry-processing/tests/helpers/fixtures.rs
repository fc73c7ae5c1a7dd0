//! Test fixtures: small PDF, docx and legacy .doc documents built in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::{FileOptions, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Wrap body XML in a WordprocessingML document part.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        body
    )
}

pub fn paragraph(text: &str) -> String {
    format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text)
}

/// Zip archive with the given members, deflated.
pub fn build_zip(members: &[(&str, &[u8])]) -> Vec<u8> {
    build_zip_with(zip::CompressionMethod::Deflated, members)
}

pub fn build_zip_with(method: zip::CompressionMethod, members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(method);
    for (name, data) in members {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Minimal docx with the given body XML plus extra members.
pub fn build_docx(body: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
    build_docx_with(zip::CompressionMethod::Deflated, body, extra)
}

/// Like [`build_docx`], but members are stored uncompressed so tests can
/// patch member bytes in place.
pub fn build_stored_docx(body: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
    build_docx_with(zip::CompressionMethod::Stored, body, extra)
}

fn build_docx_with(
    method: zip::CompressionMethod,
    body: &str,
    extra: &[(&str, &[u8])],
) -> Vec<u8> {
    let document = document_xml(body);
    let mut members: Vec<(&str, &[u8])> = vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ];
    members.extend_from_slice(extra);
    build_zip_with(method, &members)
}

/// Docx with one paragraph per entry.
pub fn create_test_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs.iter().map(|p| paragraph(p)).collect();
    build_docx(&body, &[])
}

/// Docx whose only table has one row with the given cells.
pub fn create_docx_with_table(intro: &str, cells: &[&str]) -> Vec<u8> {
    let row: String = cells
        .iter()
        .map(|c| format!("<w:tc>{}</w:tc>", paragraph(c)))
        .collect();
    let body = format!("<w:tbl><w:tr>{}</w:tr></w:tbl>{}", row, paragraph(intro));
    build_docx(&body, &[])
}

/// Docx carrying a VBA project.
pub fn create_macro_docx() -> Vec<u8> {
    build_docx(
        &paragraph("Quarterly report"),
        &[("word/vbaProject.bin", &b"\xD0\xCF\x11\xE0 vba storage"[..])],
    )
}

/// Valid local-file-header magic followed by garbage.
pub fn create_broken_zip() -> Vec<u8> {
    let mut data = b"PK\x03\x04".to_vec();
    data.extend_from_slice(&[0x5A; 256]);
    data
}

/// Single-page PDF with a correct xref table. `catalog_extra` is spliced
/// into the catalog dictionary.
pub fn build_pdf(text: &str, catalog_extra: &str) -> Vec<u8> {
    let content = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);
    let objects = [
        format!("<< /Type /Catalog /Pages 2 0 R {}>>", catalog_extra),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        )
        .as_bytes(),
    );
    pdf
}

pub fn create_test_pdf(text: &str) -> Vec<u8> {
    build_pdf(text, "")
}

/// PDF that runs JavaScript when opened.
pub fn create_pdf_with_javascript() -> Vec<u8> {
    build_pdf(
        "Invoice",
        "/OpenAction << /S /JavaScript /JS (app.alert\\('hi'\\)) >> ",
    )
}

/// Fake PE executable.
pub fn create_executable() -> Vec<u8> {
    let mut data = b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00\xFF\xFF".to_vec();
    data.extend_from_slice(b"This program cannot be run in DOS mode.");
    data
}

/// Word 97 document with one compressed (CP1252) text piece.
///
/// The FIB carries just enough for text extraction: magic, the 1Table flag,
/// ccpText and the Clx location.
pub fn create_test_doc(text: &str) -> Vec<u8> {
    let len = text.chars().count() as u32;
    create_doc_with_pieces(text, &[0, len], len)
}

/// Word 97 document whose piece table has the given character positions.
/// Every piece points at the start of the same stored text.
pub fn create_doc_with_pieces(text: &str, cps: &[u32], ccp_text: u32) -> Vec<u8> {
    const TEXT_OFFSET: usize = 0x800;

    let encoded: Vec<u8> = text
        .chars()
        .map(|c| if c == '\n' { b'\r' } else { c as u8 })
        .collect();

    let mut word = vec![0u8; TEXT_OFFSET];
    word[0..2].copy_from_slice(&0xA5ECu16.to_le_bytes());
    word[0x0A..0x0C].copy_from_slice(&0x0200u16.to_le_bytes());
    word[0x20..0x22].copy_from_slice(&14u16.to_le_bytes());
    word[0x3E..0x40].copy_from_slice(&22u16.to_le_bytes());
    word[0x4C..0x50].copy_from_slice(&ccp_text.to_le_bytes());
    word[0x98..0x9A].copy_from_slice(&93u16.to_le_bytes());
    word.extend_from_slice(&encoded);

    let mut plc = Vec::new();
    for cp in cps {
        plc.extend_from_slice(&cp.to_le_bytes());
    }
    for _ in 1..cps.len() {
        plc.extend_from_slice(&0u16.to_le_bytes());
        plc.extend_from_slice(&(0x4000_0000u32 | (TEXT_OFFSET as u32 * 2)).to_le_bytes());
        plc.extend_from_slice(&0u16.to_le_bytes());
    }

    let mut table = vec![0x02];
    table.extend_from_slice(&(plc.len() as u32).to_le_bytes());
    table.extend_from_slice(&plc);

    word[0x1A2..0x1A6].copy_from_slice(&0u32.to_le_bytes());
    word[0x1A6..0x1AA].copy_from_slice(&(table.len() as u32).to_le_bytes());

    let mut compound = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    compound
        .create_stream("/WordDocument")
        .unwrap()
        .write_all(&word)
        .unwrap();
    compound
        .create_stream("/1Table")
        .unwrap()
        .write_all(&table)
        .unwrap();
    compound.flush().unwrap();
    compound.into_inner().into_inner()
}
