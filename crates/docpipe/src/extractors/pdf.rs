//! PDF text extraction.
//!
//! Extraction runs a fixed tier list: the layout-aware `pdf-extract` pass
//! first, then a page-by-page `lopdf` pass for documents the first tier
//! cannot read. A tier that errors or produces only whitespace hands off to
//! the next one; the chain order is the fallback contract.

use async_trait::async_trait;
use lopdf::Document;

use crate::core::config::PipelineConfig;
use crate::core::mime::PDF_MIME_TYPE;
use crate::error::{DocpipeError, Result};
use crate::extractors::DocumentExtractor;

/// Inputs past these caps abort instead of chewing through pathological
/// documents.
const PDF_MAX_BYTES: usize = 64 * 1024 * 1024;
const PDF_MAX_PAGES: usize = 4096;

type PdfTier = fn(&[u8]) -> Result<Option<String>>;

const PDF_TIERS: &[(&str, PdfTier)] = &[
    ("pdf-extract", tier_pdf_extract),
    ("lopdf", tier_lopdf),
];

/// Extractor for `application/pdf` uploads.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        &[PDF_MIME_TYPE]
    }

    async fn extract_bytes(&self, content: &[u8], _config: &PipelineConfig) -> Result<String> {
        let bytes = content.to_vec();
        // PDF parsing is CPU-bound; keep it off the async worker threads.
        // A panicking tier surfaces as a join error here, not a crash.
        tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
            .await
            .map_err(|e| DocpipeError::parsing(format!("pdf extraction task failed: {e}")))?
    }
}

/// Run the tier chain over in-memory PDF bytes.
pub(crate) fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    if !is_probably_pdf(bytes) {
        return Err(DocpipeError::parsing("not a pdf: missing %PDF signature"));
    }
    if bytes.len() > PDF_MAX_BYTES {
        return Err(DocpipeError::parsing(format!(
            "pdf too large: {} bytes exceeds cap of {}",
            bytes.len(),
            PDF_MAX_BYTES
        )));
    }

    for (tier_name, tier) in PDF_TIERS {
        match tier(bytes) {
            Ok(Some(text)) => {
                tracing::debug!("{} extracted {} bytes of text", tier_name, text.len());
                return Ok(text);
            }
            Ok(None) => {
                tracing::debug!("{} found no usable text, trying next tier", tier_name);
            }
            Err(e) => {
                tracing::debug!("{} failed: {}, trying next tier", tier_name, e);
            }
        }
    }

    Err(DocpipeError::parsing("pdf extraction failed"))
}

/// Layout-aware extraction. `Ok(None)` means the document parsed but holds
/// no usable text, so the next tier should try.
fn tier_pdf_extract(bytes: &[u8]) -> Result<Option<String>> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Err(e) => Err(DocpipeError::parsing(format!(
            "layout-aware extraction failed: {e}"
        ))),
    }
}

/// Page-by-page extraction joining non-empty pages with newlines.
fn tier_lopdf(bytes: &[u8]) -> Result<Option<String>> {
    let mut document = Document::load_mem(bytes)
        .map_err(|e| DocpipeError::parsing(format!("failed to load pdf: {e}")))?;

    if document.is_encrypted() && document.decrypt("").is_err() {
        return Err(DocpipeError::parsing("cannot decrypt password-protected pdf"));
    }
    document.decompress();

    // get_pages is a BTreeMap keyed by page number, so iteration already
    // follows document page order.
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Ok(None);
    }
    if page_numbers.len() > PDF_MAX_PAGES {
        return Err(DocpipeError::parsing(format!(
            "pdf has too many pages: {} exceeds cap of {}",
            page_numbers.len(),
            PDF_MAX_PAGES
        )));
    }

    let mut pages = Vec::new();
    for page_number in page_numbers {
        match document.extract_text(&[page_number]) {
            Ok(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pages.push(trimmed.to_string());
                }
            }
            Err(e) => {
                tracing::debug!("page {} yielded no text: {}", page_number, e);
            }
        }
    }

    if pages.is_empty() {
        return Ok(None);
    }
    Ok(Some(pages.join("\n")))
}

/// Cheap signature check before handing bytes to a parser.
///
/// Tolerates a UTF-8 BOM and leading NUL or whitespace bytes, which show
/// up in PDFs that passed through sloppy transfer encodings.
pub(crate) fn is_probably_pdf(bytes: &[u8]) -> bool {
    let mut slice = bytes;
    if slice.starts_with(&[0xEF, 0xBB, 0xBF]) {
        slice = &slice[3..];
    }
    while let Some((first, rest)) = slice.split_first() {
        if *first == 0 || first.is_ascii_whitespace() {
            slice = rest;
        } else {
            break;
        }
    }
    slice.starts_with(b"%PDF")
}
