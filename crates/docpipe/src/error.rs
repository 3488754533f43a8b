//! Error types for docpipe.
//!
//! This module defines all error types used throughout the library. All errors
//! inherit from `DocpipeError` and follow Rust error handling best practices:
//!
//! - Use `thiserror` for automatic `Error` trait implementation
//! - Preserve error chains with `#[source]` attributes
//! - Include context in error messages (file paths, config values, etc.)
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `DocpipeError::Io` (from `std::io::Error`) - File system errors, permission errors
//! - These indicate real system problems that users need to know about
//! - Never wrap or suppress these - they must surface to enable bug reports
//!
//! **Application errors are wrapped with context:**
//! - `Parsing` - Document format errors, corrupt files
//! - `Storage` - Durable storage failures (temp write, rename, delete)
//! - `Validation` - Invalid configuration or parameters
//! - `Rejected` - Uploads turned away before any byte touches storage
//!
//! # Example
//!
//! ```rust
//! use docpipe::{DocpipeError, Result};
//!
//! fn check_upload_name(name: &str) -> Result<()> {
//!     // IO errors bubble up automatically via ?
//!     if name.is_empty() {
//!         return Err(DocpipeError::validation("upload has no file name"));
//!     }
//!     Ok(())
//! }
//! ```
use thiserror::Error;

use crate::types::FailedUpload;

/// Result type alias using `DocpipeError`.
///
/// This is the standard return type for all fallible operations in docpipe.
pub type Result<T> = std::result::Result<T, DocpipeError>;

/// Reason an upload was refused before storage.
///
/// Each variant maps to a stable, machine-readable reason code so callers
/// can report failures without parsing display strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("unsafe filename: {file_name:?}")]
    UnsafeFilename { file_name: String },

    #[error("file too large: {actual_bytes} bytes exceeds limit of {limit_bytes}")]
    FileTooLarge { actual_bytes: u64, limit_bytes: u64 },

    #[error("unsupported declared type: {declared}")]
    UnsupportedDeclaredType { declared: String },
}

impl UploadRejection {
    /// Stable code identifying the rejection class.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::UnsafeFilename { .. } => "UNSAFE_FILENAME",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::UnsupportedDeclaredType { .. } => "UNSUPPORTED_DECLARED_TYPE",
        }
    }
}

/// Main error type for all docpipe operations.
///
/// All errors in docpipe use this enum, which preserves error chains
/// and provides context for debugging.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `Parsing` - Document parsing errors (corrupt files, undecodable text)
/// - `Storage` - Storage errors (temp write, atomic rename, delete)
/// - `Validation` - Input validation errors (invalid paths, config, parameters)
/// - `Rejected` - Upload refused by pre-storage validation
/// - `BatchFailed` - Every file in a batch failed
/// - `Other` - Catch-all for uncommon errors
#[derive(Debug, Error)]
pub enum DocpipeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Upload rejected: {0}")]
    Rejected(#[from] UploadRejection),

    #[error("all {} uploads in batch failed", .failures.len())]
    BatchFailed { failures: Vec<FailedUpload> },

    #[error("{0}")]
    Other(String),
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl DocpipeError {
    error_constructor!(parsing, Parsing);
    error_constructor!(storage, Storage);
    error_constructor!(validation, Validation);

    /// Stable code identifying the failure class, suitable for batch reports.
    ///
    /// Rejections carry their own codes; storage-side problems collapse to
    /// `STORAGE_IO` and everything else to `INTERNAL_ERROR`.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.reason_code(),
            Self::Io(_) | Self::Storage { .. } => "STORAGE_IO",
            _ => "INTERNAL_ERROR",
        }
    }
}
