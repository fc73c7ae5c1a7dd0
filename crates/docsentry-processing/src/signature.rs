//! Magic-byte verification of declared extensions.

use docsentry_core::IngestError;

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_LOCAL_HEADER: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
const OLE2_HEADER: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Accepted leading byte sequences per declared extension.
pub const SIGNATURES: &[(&str, &[&[u8]])] = &[
    ("pdf", &[PDF_MAGIC]),
    ("docx", &[ZIP_LOCAL_HEADER]),
    ("doc", &[OLE2_HEADER]),
];

/// Signatures registered for `extension`, if any.
pub fn signatures_for(extension: &str) -> Option<&'static [&'static [u8]]> {
    SIGNATURES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, sigs)| *sigs)
}

/// Check that `content` starts with a signature registered for the declared
/// extension. The raw buffer is inspected as-is; nothing is skipped.
pub fn verify_signature(content: &[u8], extension: &str) -> Result<(), IngestError> {
    let signatures =
        signatures_for(extension).ok_or_else(|| IngestError::SignatureNotRegistered {
            extension: extension.to_string(),
        })?;

    if signatures.iter().any(|sig| content.starts_with(sig)) {
        Ok(())
    } else {
        Err(IngestError::SignatureMismatch {
            extension: extension.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_signature() {
        assert!(verify_signature(b"%PDF-1.7\n", "pdf").is_ok());
    }

    #[test]
    fn test_docx_signature() {
        assert!(verify_signature(b"PK\x03\x04rest", "docx").is_ok());
    }

    #[test]
    fn test_doc_signature() {
        let mut data = OLE2_HEADER.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        assert!(verify_signature(&data, "doc").is_ok());
    }

    #[test]
    fn test_pdf_bytes_declared_as_docx() {
        let result = verify_signature(b"%PDF-1.4", "docx");
        assert!(matches!(
            result,
            Err(IngestError::SignatureMismatch { extension }) if extension == "docx"
        ));
    }

    #[test]
    fn test_executable_declared_as_pdf() {
        let result = verify_signature(b"MZ\x90\x00\x03\x00\x00\x00", "pdf");
        assert!(matches!(result, Err(IngestError::SignatureMismatch { .. })));
    }

    #[test]
    fn test_bare_pk_prefix_is_not_a_local_header() {
        // Spanned/empty archive markers share "PK" but are not documents
        assert!(verify_signature(b"PK\x05\x06", "docx").is_err());
    }

    #[test]
    fn test_leading_whitespace_not_skipped() {
        assert!(verify_signature(b"\n%PDF-1.4", "pdf").is_err());
    }

    #[test]
    fn test_truncated_signature() {
        assert!(verify_signature(&OLE2_HEADER[..4], "doc").is_err());
    }

    #[test]
    fn test_unregistered_extension() {
        let result = verify_signature(b"hello", "txt");
        assert!(matches!(
            result,
            Err(IngestError::SignatureNotRegistered { extension }) if extension == "txt"
        ));
    }

    #[test]
    fn test_every_document_kind_has_a_signature() {
        for kind in docsentry_core::DocumentKind::ALL {
            assert!(signatures_for(kind.extension()).is_some(), "{}", kind);
        }
    }
}
