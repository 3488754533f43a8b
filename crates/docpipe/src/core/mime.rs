//! MIME type detection.
//!
//! This module determines the MIME type recorded on file descriptors. Detection
//! inspects file content first (magic-byte sniffing), then falls back to the
//! file extension, and finally to `application/octet-stream`. It never fails:
//! whatever the client declared, the descriptor carries what the bytes say.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::core::io::read_prefix_async;

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

/// Number of leading bytes read for signature sniffing.
const SNIFF_PREFIX_LEN: usize = 8192;

/// Extension to MIME type mapping for the formats the pipeline handles.
static EXT_TO_MIME: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert("txt", PLAIN_TEXT_MIME_TYPE);
    m.insert("text", PLAIN_TEXT_MIME_TYPE);
    m.insert("md", MARKDOWN_MIME_TYPE);
    m.insert("markdown", MARKDOWN_MIME_TYPE);

    m.insert("pdf", PDF_MIME_TYPE);
    m.insert("docx", DOCX_MIME_TYPE);

    m
});

/// Detect the MIME type of a stored file.
///
/// Content sniffing wins over the extension, so a PDF uploaded as
/// `notes.txt` still comes back as `application/pdf`. Files that defeat
/// both tiers are `application/octet-stream`. Read errors during sniffing
/// degrade to extension-based detection rather than failing.
pub async fn detect_content_type(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();

    if let Some(mime_type) = sniff_content_type(path).await {
        return mime_type;
    }

    mime_from_extension(path)
}

async fn sniff_content_type(path: &Path) -> Option<String> {
    let prefix = match read_prefix_async(path, SNIFF_PREFIX_LEN).await {
        Ok(prefix) => prefix,
        Err(e) => {
            tracing::debug!("could not read {} for sniffing: {}", path.display(), e);
            return None;
        }
    };
    if prefix.is_empty() {
        return None;
    }

    infer::get(&prefix).map(|kind| kind.mime_type().to_string())
}

/// Detect MIME type from a file path alone.
///
/// Uses the pipeline's extension table first, then the `mime_guess` crate,
/// then the octet-stream fallback. Total: every path maps to something.
pub fn mime_from_extension(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();

    let extension = path.extension().and_then(|ext| ext.to_str()).map(|s| s.to_lowercase());

    if let Some(ext) = &extension
        && let Some(mime_type) = EXT_TO_MIME.get(ext.as_str())
    {
        return (*mime_type).to_string();
    }

    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.to_string();
    }

    OCTET_STREAM_MIME_TYPE.to_string()
}
