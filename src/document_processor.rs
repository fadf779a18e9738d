/*!
 * Per-format text extraction and reassembly.
 *
 * Every document flows through the same shape: the raw bytes are opened
 * according to the item's declared content-type tag and reduced to an
 * ordered sequence of text segments (whole body, paragraphs, or pages);
 * after translation the segments are rebuilt into the same container type,
 * in the same order.
 *
 * Fidelity is deliberately limited to the text itself:
 * - Word documents lose styles, tables and embedded objects; the output is
 *   a fresh document with one plain paragraph per source paragraph.
 * - PDF output is best-effort: each source page becomes a new page carrying
 *   the translated text as a single fixed-position Helvetica block. Layout,
 *   images and fonts are not preserved.
 */

use std::io::{Cursor, Read, Write};

use log::debug;
use quick_xml::events::Event;

use crate::errors::DocumentError;

/// Content-type tag of Word (.docx) documents
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Content-type tag of PDF documents
pub const MIME_PDF: &str = "application/pdf";

// Fixed text-block geometry for rebuilt PDF pages (US Letter)
const PDF_PAGE_WIDTH: i64 = 612;
const PDF_PAGE_HEIGHT: i64 = 792;
const PDF_FONT_SIZE: i64 = 12;
const PDF_LINE_LEADING: i64 = 14;
const PDF_TEXT_X: i64 = 72;
const PDF_TEXT_Y: i64 = 720;

/// The closed set of document kinds the pipeline can process.
///
/// The dispatch key is the declared content-type tag of the source item.
/// Tags outside the known set map to [`ContentKind::Unknown`], which is
/// handled with the plain-text behavior rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Free text and subtitle files, translated as one undivided body
    PlainText,
    /// Word (.docx) documents, translated paragraph by paragraph
    WordDocument,
    /// PDF documents, translated page by page
    PdfDocument,
    /// Unrecognized tag, treated as plain text
    Unknown,
}

impl ContentKind {
    /// Map a content-type tag onto a document kind
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            MIME_DOCX => Self::WordDocument,
            MIME_PDF => Self::PdfDocument,
            _ if tag.starts_with("text/") || tag == "application/x-subrip" => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    // @returns: Human-readable kind name for logs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PlainText => "plain text",
            Self::WordDocument => "Word document",
            Self::PdfDocument => "PDF document",
            Self::Unknown => "unknown (treated as plain text)",
        }
    }
}

/// Extract the ordered text segments of a document.
///
/// Plain text yields a single segment holding the whole body; Word
/// documents yield one segment per paragraph; PDFs yield one segment per
/// page. Segment order follows document order and is preserved end-to-end.
pub fn extract_segments(kind: ContentKind, content: &[u8]) -> Result<Vec<String>, DocumentError> {
    let segments = match kind {
        ContentKind::PlainText | ContentKind::Unknown => {
            let body = String::from_utf8(content.to_vec())
                .map_err(|e| DocumentError::Parse(format!("not valid UTF-8: {}", e)))?;
            vec![body]
        }
        ContentKind::WordDocument => extract_docx_paragraphs(content)?,
        ContentKind::PdfDocument => extract_pdf_pages(content)?,
    };

    debug!(
        "Extracted {} segment(s) from {}",
        segments.len(),
        kind.display_name()
    );

    Ok(segments)
}

/// Rebuild a document of the given kind from translated segments,
/// preserving segment order.
pub fn reassemble(kind: ContentKind, segments: &[String]) -> Result<Vec<u8>, DocumentError> {
    match kind {
        ContentKind::PlainText | ContentKind::Unknown => Ok(segments.join("\n").into_bytes()),
        ContentKind::WordDocument => build_docx(segments),
        ContentKind::PdfDocument => build_pdf(segments),
    }
}

/// Pull the `word/document.xml` part out of a .docx container
fn read_docx_document_xml(content: &[u8]) -> Result<Vec<u8>, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(content))
        .map_err(|e| DocumentError::Ooxml(e.to_string()))?;

    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| DocumentError::Ooxml("word/document.xml not found".to_string()))?;

    let mut xml = Vec::new();
    entry
        .read_to_end(&mut xml)
        .map_err(|e| DocumentError::Ooxml(e.to_string()))?;

    Ok(xml)
}

/// Walk the document XML and collect one text segment per `w:p` paragraph.
/// Text lives in `w:t` runs; explicit `w:br` breaks become newlines within
/// the paragraph.
fn extract_docx_paragraphs(content: &[u8]) -> Result<Vec<String>, DocumentError> {
    let xml = read_docx_document_xml(content)?;

    let mut reader = quick_xml::Reader::from_reader(xml.as_slice());
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| DocumentError::Ooxml(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"w:br" => current.push('\n'),
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

const DOCX_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const DOCX_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Build a fresh minimal .docx holding one plain paragraph per segment
fn build_docx(segments: &[String]) -> Result<Vec<u8>, DocumentError> {
    let mut body = String::new();
    for segment in segments {
        body.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
        body.push_str(&quick_xml::escape::escape(segment.as_str()));
        body.push_str("</w:t></w:r></w:p>");
    }

    let document_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();

    let parts: [(&str, &str); 3] = [
        ("[Content_Types].xml", DOCX_CONTENT_TYPES),
        ("_rels/.rels", DOCX_RELS),
        ("word/document.xml", &document_xml),
    ];
    for (name, part) in parts {
        writer
            .start_file(name, options)
            .map_err(|e| DocumentError::Reassembly(e.to_string()))?;
        writer
            .write_all(part.as_bytes())
            .map_err(|e| DocumentError::Reassembly(e.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| DocumentError::Reassembly(e.to_string()))?;

    Ok(cursor.into_inner())
}

/// Extract per-page text from a PDF, one segment per page in page order
fn extract_pdf_pages(content: &[u8]) -> Result<Vec<String>, DocumentError> {
    let doc = lopdf::Document::load_mem(content).map_err(|e| DocumentError::Pdf(e.to_string()))?;

    let pages = doc.get_pages();
    let mut segments = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = doc
            .extract_text(&[*page_number])
            .map_err(|e| DocumentError::Pdf(format!("page {}: {}", page_number, e)))?;
        segments.push(text.trim_end().to_string());
    }

    Ok(segments)
}

/// Build a fresh PDF with one page per segment, rendering the segment's
/// text as a single Helvetica block at a fixed position
fn build_pdf(segments: &[String]) -> Result<Vec<u8>, DocumentError> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(segments.len());
    for segment in segments {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), PDF_FONT_SIZE.into()]),
            Operation::new("TL", vec![PDF_LINE_LEADING.into()]),
            Operation::new("Td", vec![PDF_TEXT_X.into(), PDF_TEXT_Y.into()]),
        ];
        for (i, line) in segment.split('\n').enumerate() {
            if i > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let encoded = Content { operations }
            .encode()
            .map_err(|e| DocumentError::Reassembly(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PDF_PAGE_WIDTH.into(), PDF_PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DocumentError::Reassembly(e.to_string()))?;

    Ok(out)
}
