//! Byte-level synthesis of fixture content.
//!
//! Binary fixtures are stand-ins, not parseable documents: a format signature
//! followed by filler, which is all the upload surfaces sniff for.

use crate::catalog::{FileKind, FixtureSpec};
use crate::error::{FixtureError, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// ZIP local file header (`PK\x03\x04`), shared by docx/xlsx/pptx.
pub const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE compound file header used by legacy doc/xls/ppt.
pub const OLE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG SOI followed by an APP0 marker.
pub const JPEG_SIGNATURE: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

/// Comment line separating the PDF body from its filler.
const PDF_PADDING_MARKER: &str = "\n% Padding:\n";

const PDF_FILLER: u8 = b'X';

/// Minimal one-page PDF with a Helvetica text run.
pub const PDF_BODY: &str = "%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> >> >> /MediaBox [0 0 612 792] /Contents 4 0 R >>
endobj
4 0 obj
<< /Length 44 >>
stream
BT
/F1 12 Tf
100 700 Td
(Test PDF Document) Tj
ET
endstream
endobj
xref
0 5
0000000000 65535 f
0000000009 00000 n
0000000056 00000 n
0000000115 00000 n
0000000317 00000 n
trailer
<< /Size 5 /Root 1 0 R >>
startxref
406
%%EOF
";

pub const SVG_MARKUP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="100" height="100" xmlns="http://www.w3.org/2000/svg">
  <circle cx="50" cy="50" r="40" fill="blue" />
  <text x="50" y="55" text-anchor="middle" fill="white" font-size="16">Test</text>
</svg>
"#;

pub const CSV_TABLE: &str = "Name,Email,Age,City
John Doe,john@example.com,30,New York
Jane Smith,jane@example.com,25,Los Angeles
Bob Johnson,bob@example.com,35,Chicago
";

/// Signature an image fixture starts with, chosen by file extension.
/// Extensions without a known signature (gif, webp, ...) get none.
pub fn image_signature(name: &str) -> &'static [u8] {
    match extension_of(name).as_deref() {
        Some("png") => &PNG_SIGNATURE,
        Some("jpg") | Some("jpeg") => &JPEG_SIGNATURE,
        _ => &[],
    }
}

/// Lowercased extension without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Append `fill` bytes to `header` until the buffer is exactly `target` bytes.
///
/// A target smaller than the header is a caller error: truncating would
/// corrupt the signature the fixture exists to carry.
pub fn pad_to(name: &str, header: &[u8], target: u64, fill: u8) -> Result<Vec<u8>> {
    let header_len = header.len() as u64;
    if target < header_len {
        return Err(FixtureError::SizeBelowHeader {
            name: name.to_string(),
            header_len,
            requested: target,
        });
    }

    let mut content = Vec::with_capacity(target as usize);
    content.extend_from_slice(header);
    content.resize(target as usize, fill);
    Ok(content)
}

fn pdf_header() -> Vec<u8> {
    let mut header = PDF_BODY.as_bytes().to_vec();
    header.extend_from_slice(PDF_PADDING_MARKER.as_bytes());
    header
}

fn random_bytes(len: u64) -> Result<Vec<u8>> {
    let mut content = vec![0u8; len as usize];
    OsRng.try_fill_bytes(&mut content)?;
    Ok(content)
}

/// Render the full byte content for one catalog entry.
pub fn render(spec: &FixtureSpec) -> Result<Vec<u8>> {
    let target = spec.size_bytes;
    match &spec.kind {
        FileKind::Text { content } => Ok(content.as_bytes().to_vec()),
        FileKind::Svg => Ok(SVG_MARKUP.as_bytes().to_vec()),
        FileKind::Csv => Ok(CSV_TABLE.as_bytes().to_vec()),
        FileKind::Empty => Ok(Vec::new()),
        FileKind::Pdf => pad_to(&spec.name, &pdf_header(), target, PDF_FILLER),
        FileKind::ZipContainer => pad_to(&spec.name, &ZIP_SIGNATURE, target, 0),
        FileKind::OleCompound => pad_to(&spec.name, &OLE_SIGNATURE, target, 0),
        FileKind::Image => pad_to(&spec.name, image_signature(&spec.name), target, 0),
        FileKind::Filled { byte } => Ok(vec![*byte; target as usize]),
        FileKind::Random => random_bytes(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FixtureRole;

    #[test]
    fn test_pad_to_exact_length() {
        let content = pad_to("report.docx", &ZIP_SIGNATURE, 4096, 0).unwrap();
        assert_eq!(content.len(), 4096);
        assert_eq!(&content[..4], &ZIP_SIGNATURE);
        assert!(content[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_pad_to_header_only() {
        let content = pad_to("tiny.xls", &OLE_SIGNATURE, 8, 0).unwrap();
        assert_eq!(content, OLE_SIGNATURE.to_vec());
    }

    #[test]
    fn test_pad_to_rejects_target_below_header() {
        let err = pad_to("tiny.png", &PNG_SIGNATURE, 7, 0).unwrap_err();
        match err {
            FixtureError::SizeBelowHeader { header_len, requested, .. } => {
                assert_eq!(header_len, 8);
                assert_eq!(requested, 7);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_image_signature_by_extension() {
        assert_eq!(image_signature("photo.JPG"), &JPEG_SIGNATURE);
        assert_eq!(image_signature("sample.jpeg"), &JPEG_SIGNATURE);
        assert_eq!(image_signature("image.png"), &PNG_SIGNATURE);
        assert!(image_signature("sample.gif").is_empty());
        assert!(image_signature("sample.webp").is_empty());
        assert!(image_signature("noext").is_empty());
    }

    #[test]
    fn test_render_pdf_is_exact_and_padded() {
        let spec = FixtureSpec::new("sample.pdf", 8 * 1024, FileKind::Pdf, FixtureRole::Supported);
        let content = render(&spec).unwrap();
        assert_eq!(content.len(), 8 * 1024);
        assert!(content.starts_with(b"%PDF-1.4"));
        assert_eq!(content.last(), Some(&PDF_FILLER));
    }

    #[test]
    fn test_render_pdf_without_padding() {
        let header_len = pdf_header().len() as u64;
        let spec = FixtureSpec::new("snug.pdf", header_len, FileKind::Pdf, FixtureRole::Supported);
        let content = render(&spec).unwrap();
        assert_eq!(content.len() as u64, header_len);
        assert!(content.ends_with(PDF_PADDING_MARKER.as_bytes()));
    }

    #[test]
    fn test_render_random_has_requested_length() {
        let spec = FixtureSpec::new("video.mp4", 2048, FileKind::Random, FixtureRole::Unsupported);
        let first = render(&spec).unwrap();
        let second = render(&spec).unwrap();
        assert_eq!(first.len(), 2048);
        // 2 KiB from the OS RNG colliding would mean the source is broken
        assert_ne!(first, second);
    }

    #[test]
    fn test_render_filled() {
        let spec = FixtureSpec::new("a.txt", 100, FileKind::Filled { byte: b'A' }, FixtureRole::AtLimit);
        let content = render(&spec).unwrap();
        assert_eq!(content, vec![b'A'; 100]);
    }

    #[test]
    fn test_sniffable_signatures() {
        let png = pad_to("x.png", &PNG_SIGNATURE, 64, 0).unwrap();
        assert_eq!(infer::get(&png).map(|t| t.mime_type()), Some("image/png"));

        let jpeg = pad_to("x.jpg", &JPEG_SIGNATURE, 64, 0).unwrap();
        assert_eq!(infer::get(&jpeg).map(|t| t.mime_type()), Some("image/jpeg"));

        let pdf = render(&FixtureSpec::new("x.pdf", 2048, FileKind::Pdf, FixtureRole::Supported)).unwrap();
        assert_eq!(infer::get(&pdf).map(|t| t.mime_type()), Some("application/pdf"));
    }
}
