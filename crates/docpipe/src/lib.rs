//! Docpipe - Document Ingestion Pipeline
//!
//! Docpipe is a Rust-first upload ingestion library. It validates incoming
//! files, writes them to durable storage under collision-free keys, detects
//! their real content type from bytes, and extracts plain text from PDF,
//! DOCX, and text documents.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docpipe::{IngestPipeline, PipelineConfig, UploadedBlob};
//!
//! # fn main() -> docpipe::Result<()> {
//! // Ingest one upload end to end
//! let pipeline = IngestPipeline::new(PipelineConfig::default());
//! let blob = UploadedBlob::new("notes.txt", None, b"hello".to_vec());
//! let descriptor = pipeline.ingest_sync(blob, None)?;
//! println!("Stored as {}", descriptor.storage_key);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): Ingestion orchestration, validation, storage,
//!   MIME detection, config loading
//! - **Extractors** (`extractors`): Format-specific text extraction behind the
//!   [`DocumentExtractor`] trait
//!
//! # Features
//!
//! - Async-first API with sync wrappers on a shared runtime
//! - Concurrent batch ingestion with partial-success reporting
//! - Content-sniffing MIME detection that distrusts client claims
//! - Atomic storage writes with automatic cleanup on failure

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extractors;
pub mod types;

pub use error::{DocpipeError, Result, UploadRejection};
pub use types::*;

pub use core::config::{DEFAULT_MAX_FILE_SIZE_BYTES, PipelineConfig};
pub use core::ingest::IngestPipeline;
pub use core::storage::StorageWriter;
pub use core::validate::validate_upload;

pub use core::mime::{
    DOCX_MIME_TYPE, MARKDOWN_MIME_TYPE, OCTET_STREAM_MIME_TYPE, PDF_MIME_TYPE,
    PLAIN_TEXT_MIME_TYPE, detect_content_type,
};

pub use extractors::{
    DocumentExtractor, DocxExtractor, ExtractionDispatcher, PdfExtractor, PdfSupport,
    PlainTextExtractor,
};
