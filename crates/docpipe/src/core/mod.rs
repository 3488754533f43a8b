//! Core ingestion orchestration module.
//!
//! This module contains the main ingestion logic and orchestration layer for docpipe.
//! It provides the primary entry points for single and batch upload ingestion, and
//! manages validation, durable storage, MIME type detection, and configuration.
//!
//! # Architecture
//!
//! The core module is responsible for:
//! - **Entry Points**: The [`IngestPipeline`](ingest::IngestPipeline) with its
//!   `ingest()` and `ingest_batch()` methods
//! - **Validation**: Pre-storage checks on file name, size, and declared type
//! - **Storage**: Atomic writes into the storage root under collision-free keys
//! - **MIME Detection**: Detecting content types from stored bytes and extensions
//! - **Configuration**: Loading and managing pipeline configuration
//! - **I/O**: Async file reading utilities
//!
//! # Example
//!
//! ```rust,no_run
//! use docpipe::core::config::PipelineConfig;
//! use docpipe::core::ingest::IngestPipeline;
//! use docpipe::types::UploadedBlob;
//!
//! # async fn example() -> docpipe::Result<()> {
//! let pipeline = IngestPipeline::new(PipelineConfig::default());
//! let blob = UploadedBlob::new("notes.txt", None, b"hello".to_vec());
//! let descriptor = pipeline.ingest(blob, None).await?;
//! println!("Stored as {}", descriptor.storage_key);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ingest;
pub mod io;
pub mod mime;
pub mod storage;
pub mod validate;

pub use config::{DEFAULT_MAX_FILE_SIZE_BYTES, PipelineConfig};
pub use ingest::IngestPipeline;
pub use storage::StorageWriter;
pub use validate::validate_upload;
