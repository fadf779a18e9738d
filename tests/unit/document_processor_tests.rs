/*!
 * Tests for per-format extraction and reassembly
 */

use doctrans::document_processor::{
    ContentKind, MIME_DOCX, MIME_PDF, extract_segments, reassemble,
};

use crate::common;

// ============================================================================
// Content kind dispatch
// ============================================================================

#[test]
fn test_contentKind_fromTag_shouldMapKnownTags() {
    assert_eq!(ContentKind::from_tag("text/plain"), ContentKind::PlainText);
    assert_eq!(ContentKind::from_tag("text/markdown"), ContentKind::PlainText);
    assert_eq!(ContentKind::from_tag("application/x-subrip"), ContentKind::PlainText);
    assert_eq!(ContentKind::from_tag(MIME_DOCX), ContentKind::WordDocument);
    assert_eq!(ContentKind::from_tag(MIME_PDF), ContentKind::PdfDocument);
}

#[test]
fn test_contentKind_fromTag_withUnrecognizedTag_shouldMapToUnknown() {
    assert_eq!(ContentKind::from_tag("application/octet-stream"), ContentKind::Unknown);
    assert_eq!(ContentKind::from_tag(""), ContentKind::Unknown);
}

// ============================================================================
// Plain text
// ============================================================================

#[test]
fn test_extract_plainText_shouldYieldWholeBodyAsOneSegment() {
    let body = "line1\nline2\nline3";

    let segments = extract_segments(ContentKind::PlainText, body.as_bytes()).unwrap();

    assert_eq!(segments, vec![body.to_string()]);
}

#[test]
fn test_extract_unknownKind_shouldBehaveLikePlainText() {
    let segments = extract_segments(ContentKind::Unknown, b"some text").unwrap();

    assert_eq!(segments, vec!["some text".to_string()]);
}

#[test]
fn test_extract_plainText_withInvalidUtf8_shouldError() {
    let result = extract_segments(ContentKind::PlainText, &[0xff, 0xfe, 0x00]);

    assert!(result.is_err());
}

#[test]
fn test_reassemble_plainText_shouldWriteBodyVerbatim() {
    let segments = vec!["translated body".to_string()];

    let output = reassemble(ContentKind::PlainText, &segments).unwrap();

    assert_eq!(output, b"translated body");
}

// ============================================================================
// Word documents
// ============================================================================

#[test]
fn test_extract_docx_shouldYieldOneSegmentPerParagraph() {
    let content = common::build_test_docx(&["First paragraph.", "Second one.", "Third."]);

    let segments = extract_segments(ContentKind::WordDocument, &content).unwrap();

    assert_eq!(
        segments,
        vec![
            "First paragraph.".to_string(),
            "Second one.".to_string(),
            "Third.".to_string()
        ]
    );
}

#[test]
fn test_extract_docx_withGarbageBytes_shouldError() {
    let result = extract_segments(ContentKind::WordDocument, b"this is not a zip archive");

    assert!(result.is_err());
}

#[test]
fn test_reassemble_docx_shouldPreserveParagraphOrder() {
    // Translate-and-rebuild: the rebuilt document's paragraphs must come
    // back in the source order
    let translated = vec![
        "premier".to_string(),
        "deuxieme".to_string(),
        "troisieme".to_string(),
    ];

    let output = reassemble(ContentKind::WordDocument, &translated).unwrap();
    let segments = extract_segments(ContentKind::WordDocument, &output).unwrap();

    assert_eq!(segments, translated);
}

#[test]
fn test_reassemble_docx_shouldEscapeMarkupCharacters() {
    let translated = vec!["a < b && c > d".to_string()];

    let output = reassemble(ContentKind::WordDocument, &translated).unwrap();
    let segments = extract_segments(ContentKind::WordDocument, &output).unwrap();

    assert_eq!(segments, translated);
}

// ============================================================================
// PDF documents
// ============================================================================

#[test]
fn test_extract_pdf_shouldYieldPageText() {
    let content = common::build_test_pdf("sample page text");

    let segments = extract_segments(ContentKind::PdfDocument, &content).unwrap();

    assert_eq!(segments.len(), 1);
    assert!(
        segments[0].contains("sample page text"),
        "expected page text, got: {:?}",
        segments[0]
    );
}

#[test]
fn test_extract_pdf_withGarbageBytes_shouldError() {
    let result = extract_segments(ContentKind::PdfDocument, b"not a pdf at all");

    assert!(result.is_err());
}

#[test]
fn test_reassemble_pdf_shouldProduceOnePagePerSegment() {
    let translated = vec!["page one".to_string(), "page two".to_string()];

    let output = reassemble(ContentKind::PdfDocument, &translated).unwrap();

    assert!(output.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_reassemble_pdf_withMultilineSegment_shouldLoad() {
    let translated = vec!["first line\nsecond line\nthird line".to_string()];

    let output = reassemble(ContentKind::PdfDocument, &translated).unwrap();

    let doc = lopdf::Document::load_mem(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}
