//! DOCX extraction via streaming XML parsing.
//!
//! A `.docx` file is a zip archive; the document body lives in
//! `word/document.xml`. One pass over that XML collects body paragraphs in
//! document order and table cell text in row-major order. Paragraph text
//! comes first in the output, then every table cell, one fragment per line.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::core::config::PipelineConfig;
use crate::core::mime::DOCX_MIME_TYPE;
use crate::error::{DocpipeError, Result};
use crate::extractors::DocumentExtractor;

/// Extractor for Word `.docx` uploads.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for DocxExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        &[DOCX_MIME_TYPE]
    }

    async fn extract_bytes(&self, content: &[u8], _config: &PipelineConfig) -> Result<String> {
        let bytes = content.to_vec();
        // Unzipping and XML parsing are CPU-bound; keep them off the async
        // worker threads.
        tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
            .await
            .map_err(|e| DocpipeError::parsing(format!("docx extraction task failed: {e}")))?
    }
}

/// Extract text from in-memory DOCX bytes.
///
/// Any structural problem (not a zip, missing document part, malformed
/// XML) surfaces as a single `docx extraction failed` parsing error with
/// the underlying cause attached as its source.
pub(crate) fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let text = read_document_xml(bytes).and_then(|xml| parse_document_xml(&xml));
    text.map_err(|err| {
        tracing::debug!("docx parse failed: {}", err);
        DocpipeError::parsing_with_source("docx extraction failed", err)
    })
}

fn read_document_xml(bytes: &[u8]) -> Result<String> {
    let cursor = Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)
        .map_err(|e| DocpipeError::parsing(format!("failed to open docx as zip: {e}")))?;

    let mut document = archive
        .by_name("word/document.xml")
        .map_err(|e| DocpipeError::parsing(format!("word/document.xml missing: {e}")))?;

    let mut content = String::new();
    document
        .read_to_string(&mut content)
        .map_err(|e| DocpipeError::parsing(format!("failed to read document.xml: {e}")))?;

    Ok(content)
}

/// Walk the document body in one pass.
///
/// `tbl_depth` tracks table nesting: paragraphs at depth 0 are body text,
/// everything deeper accumulates into the enclosing outermost cell. Cells
/// of nested tables fold into their parent cell rather than producing
/// fragments of their own.
fn parse_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut paragraphs: Vec<String> = Vec::new();
    let mut table_cells: Vec<String> = Vec::new();

    let mut tbl_depth = 0usize;
    let mut in_text_run = false;
    let mut para_buf = String::new();
    let mut cell_buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => tbl_depth += 1,
                b"w:tc" if tbl_depth == 1 => cell_buf.clear(),
                b"w:p" if tbl_depth > 0 => {
                    // Paragraphs within one cell join with a single space.
                    if !cell_buf.is_empty() {
                        cell_buf.push(' ');
                    }
                }
                b"w:t" => in_text_run = true,
                b"w:tab" => push_break(tbl_depth, &mut para_buf, &mut cell_buf, '\t'),
                b"w:br" | b"w:cr" => push_break(tbl_depth, &mut para_buf, &mut cell_buf, '\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => push_break(tbl_depth, &mut para_buf, &mut cell_buf, '\t'),
                b"w:br" | b"w:cr" => push_break(tbl_depth, &mut para_buf, &mut cell_buf, '\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_run {
                    let text = e
                        .unescape()
                        .map_err(|err| DocpipeError::parsing(format!("bad text run: {err}")))?;
                    if tbl_depth == 0 {
                        para_buf.push_str(&text);
                    } else {
                        cell_buf.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => tbl_depth = tbl_depth.saturating_sub(1),
                b"w:p" if tbl_depth == 0 => {
                    let trimmed = para_buf.trim();
                    if !trimmed.is_empty() {
                        paragraphs.push(trimmed.to_string());
                    }
                    para_buf.clear();
                }
                b"w:tc" if tbl_depth == 1 => {
                    let trimmed = cell_buf.trim();
                    if !trimmed.is_empty() {
                        table_cells.push(trimmed.to_string());
                    }
                    cell_buf.clear();
                }
                b"w:t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(DocpipeError::parsing(format!(
                    "xml parsing error at position {}: {}",
                    reader.buffer_position(),
                    err
                )));
            }
            _ => {}
        }
    }

    paragraphs.extend(table_cells);
    Ok(paragraphs.join("\n"))
}

fn push_break(tbl_depth: usize, para_buf: &mut String, cell_buf: &mut String, ch: char) {
    if tbl_depth == 0 {
        para_buf.push(ch);
    } else {
        cell_buf.push(ch);
    }
}
