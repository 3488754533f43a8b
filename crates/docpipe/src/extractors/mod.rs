//! Built-in document extractors and the dispatcher that routes to them.
//!
//! Each format ships as a strategy implementing [`DocumentExtractor`]. The
//! [`ExtractionDispatcher`] picks a strategy by detected MIME type and turns
//! every failure mode into an [`ExtractionOutcome`]: extraction problems
//! never fail an upload, they only downgrade the descriptor.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::PipelineConfig;
use crate::core::mime::PDF_MIME_TYPE;
use crate::error::Result;
use crate::types::ExtractionOutcome;

pub mod docx;
pub mod pdf;
pub mod text;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;
pub use text::PlainTextExtractor;

/// Trait for document text-extraction strategies.
///
/// Implement this trait to add support for a new document format or to
/// replace a built-in strategy. Strategies must be thread-safe
/// (`Send + Sync`) to support concurrent batch ingestion.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Exact MIME types this strategy accepts.
    fn supported_mime_types(&self) -> &[&'static str];

    /// Whether this strategy handles the given MIME type.
    fn can_handle(&self, mime_type: &str) -> bool {
        self.supported_mime_types().contains(&mime_type)
    }

    /// Extract plain text from in-memory document bytes.
    ///
    /// # Errors
    ///
    /// - `DocpipeError::Parsing` - Document parsing failed
    /// - `DocpipeError::Io` - I/O errors (these always bubble up)
    async fn extract_bytes(&self, content: &[u8], config: &PipelineConfig) -> Result<String>;

    /// Extract plain text from a file on disk.
    ///
    /// Default implementation reads the file and calls `extract_bytes`.
    async fn extract_path(&self, path: &Path, config: &PipelineConfig) -> Result<String> {
        let content = crate::core::io::read_file_async(path).await?;
        self.extract_bytes(&content, config).await
    }
}

/// Whether PDF extraction is wired up in this dispatcher.
///
/// PDF support is modeled as a capability rather than assumed, so a build
/// or deployment without a working PDF stack degrades to `Unavailable`
/// outcomes instead of erroring.
pub enum PdfSupport {
    Available(Arc<dyn DocumentExtractor>),
    Unavailable,
}

impl PdfSupport {
    /// The built-in PDF strategy.
    pub fn available() -> Self {
        Self::Available(Arc::new(PdfExtractor::new()))
    }
}

impl std::fmt::Debug for PdfSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("PdfSupport::Available"),
            Self::Unavailable => f.write_str("PdfSupport::Unavailable"),
        }
    }
}

/// Routes stored files to extraction strategies by MIME type.
pub struct ExtractionDispatcher {
    pdf: PdfSupport,
    strategies: Vec<Arc<dyn DocumentExtractor>>,
}

impl ExtractionDispatcher {
    /// Dispatcher with the built-in DOCX and text strategies plus the
    /// given PDF capability.
    pub fn new(pdf: PdfSupport) -> Self {
        let strategies: Vec<Arc<dyn DocumentExtractor>> = vec![
            Arc::new(DocxExtractor::new()),
            Arc::new(PlainTextExtractor::new()),
        ];
        Self { pdf, strategies }
    }

    /// Dispatcher with every built-in strategy enabled.
    pub fn with_default_strategies() -> Self {
        Self::new(PdfSupport::available())
    }

    /// Attempt extraction for a stored file.
    ///
    /// Never returns an error: unsupported types, missing PDF support,
    /// and strategy failures all map to `ExtractionOutcome::Unavailable`
    /// with a human-readable reason.
    pub async fn extract(
        &self,
        path: &Path,
        mime_type: &str,
        config: &PipelineConfig,
    ) -> ExtractionOutcome {
        let strategy = if mime_type == PDF_MIME_TYPE {
            match &self.pdf {
                PdfSupport::Available(strategy) => Arc::clone(strategy),
                PdfSupport::Unavailable => {
                    tracing::debug!("pdf support unavailable, skipping {}", path.display());
                    return ExtractionOutcome::unavailable("pdf support unavailable");
                }
            }
        } else {
            match self.strategies.iter().find(|s| s.can_handle(mime_type)) {
                Some(strategy) => Arc::clone(strategy),
                None => {
                    tracing::debug!("no extraction strategy for mime type {}", mime_type);
                    return ExtractionOutcome::unavailable(format!(
                        "unsupported mime type: {mime_type}"
                    ));
                }
            }
        };

        match strategy.extract_path(path, config).await {
            Ok(text) => ExtractionOutcome::text(text),
            Err(e) => {
                tracing::warn!("{} extraction failed for {}: {}", strategy.name(), path.display(), e);
                ExtractionOutcome::unavailable(e.to_string())
            }
        }
    }
}

impl Default for ExtractionDispatcher {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}

impl std::fmt::Debug for ExtractionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("ExtractionDispatcher")
            .field("pdf", &self.pdf)
            .field("strategies", &names)
            .finish()
    }
}
