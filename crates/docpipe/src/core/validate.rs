//! Pre-storage upload validation.
//!
//! Every check here runs before a single byte reaches disk. Checks run in a
//! fixed order (filename, size, declared type) and the first failure wins,
//! so callers see deterministic reason codes.

use crate::core::config::PipelineConfig;
use crate::error::UploadRejection;

/// Substrings that disqualify a filename outright.
///
/// `..` blocks traversal, the separators block path injection, and the rest
/// are characters no supported filesystem target accepts.
const UNSAFE_FILENAME_PATTERNS: &[&str] = &["..", "/", "\\", "<", ">", ":", "\"", "|", "?", "*"];

/// Validate an upload against the pipeline's acceptance rules.
///
/// # Arguments
///
/// * `file_name` - Client-supplied name, checked against the deny-list
/// * `declared_mime_type` - Client's claimed type; `None` skips the allow-list gate
/// * `byte_length` - Upload size; strictly larger than the cap is rejected
/// * `config` - Pipeline configuration holding the cap and allow-list
///
/// # Errors
///
/// Returns the first failing [`UploadRejection`] in check order.
pub fn validate_upload(
    file_name: &str,
    declared_mime_type: Option<&str>,
    byte_length: u64,
    config: &PipelineConfig,
) -> Result<(), UploadRejection> {
    if file_name.trim().is_empty() {
        return Err(UploadRejection::UnsafeFilename {
            file_name: file_name.to_string(),
        });
    }

    if let Some(pattern) = UNSAFE_FILENAME_PATTERNS.iter().find(|p| file_name.contains(**p)) {
        tracing::debug!("rejecting filename {:?}: contains {:?}", file_name, pattern);
        return Err(UploadRejection::UnsafeFilename {
            file_name: file_name.to_string(),
        });
    }

    if byte_length > config.max_file_size_bytes {
        return Err(UploadRejection::FileTooLarge {
            actual_bytes: byte_length,
            limit_bytes: config.max_file_size_bytes,
        });
    }

    if let Some(declared) = declared_mime_type
        && !config.allowed_declared_mime_types.iter().any(|allowed| allowed == declared)
    {
        return Err(UploadRejection::UnsupportedDeclaredType {
            declared: declared.to_string(),
        });
    }

    Ok(())
}
