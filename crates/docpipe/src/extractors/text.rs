//! Plain text and Markdown extraction.
//!
//! Text files arrive in whatever encoding the client's platform produced, so
//! decoding walks a fixed chain of candidates and the first tier that accepts
//! the bytes wins. The decoded text is returned verbatim: byte-order marks,
//! trailing newlines, and internal whitespace all survive.

use async_trait::async_trait;
use encoding_rs::WINDOWS_1252;

use crate::core::config::PipelineConfig;
use crate::core::mime::{MARKDOWN_MIME_TYPE, PLAIN_TEXT_MIME_TYPE};
use crate::error::{DocpipeError, Result};
use crate::extractors::DocumentExtractor;

/// Candidate encodings, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
    Iso8859_1,
}

/// The decoding chain is data, so reordering or extending it is a
/// one-line change. Latin-1 maps every byte, which makes the later tiers
/// unreachable today; they stay because the chain is the documented
/// contract, not an optimization.
pub const DECODING_CHAIN: &[TextEncoding] = &[
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
    TextEncoding::Iso8859_1,
];

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "windows-1252",
            Self::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Attempt a decode under this encoding. `None` means the bytes are
    /// not valid for it and the next tier should run.
    fn decode(self, content: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(content).ok().map(str::to_owned),
            // ISO-8859-1 maps bytes 0x00-0xFF straight to U+0000-U+00FF.
            Self::Latin1 | Self::Iso8859_1 => {
                Some(encoding_rs::mem::decode_latin1(content).into_owned())
            }
            Self::Windows1252 => {
                let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(content);
                if had_errors { None } else { Some(text.into_owned()) }
            }
        }
    }
}

/// Decode raw bytes through the fallback chain.
///
/// # Errors
///
/// Returns `DocpipeError::Parsing` only if every tier refuses the bytes.
pub fn decode_text(content: &[u8]) -> Result<String> {
    for encoding in DECODING_CHAIN {
        if let Some(text) = encoding.decode(content) {
            return Ok(text);
        }
        tracing::debug!("{} rejected input, trying next encoding", encoding.label());
    }

    Err(DocpipeError::parsing("could not decode text file"))
}

/// Extractor for `text/plain` and `text/markdown` uploads.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn supported_mime_types(&self) -> &[&'static str] {
        &[PLAIN_TEXT_MIME_TYPE, MARKDOWN_MIME_TYPE]
    }

    async fn extract_bytes(&self, content: &[u8], _config: &PipelineConfig) -> Result<String> {
        decode_text(content)
    }
}
