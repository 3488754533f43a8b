//! Configuration loading and management.
//!
//! This module provides utilities for loading pipeline configuration from various
//! sources (TOML, YAML, JSON) and discovering configuration files in the project hierarchy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::mime::{DOCX_MIME_TYPE, MARKDOWN_MIME_TYPE, PDF_MIME_TYPE, PLAIN_TEXT_MIME_TYPE};
use crate::error::{DocpipeError, Result};

/// Default per-file size cap: 25 MiB.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 26_214_400;

/// Main pipeline configuration.
///
/// This struct contains all configuration options for upload ingestion.
/// It can be loaded from TOML, YAML, or JSON files, or created programmatically.
///
/// # Example
///
/// ```rust
/// use docpipe::PipelineConfig;
///
/// // Create with defaults
/// let config = PipelineConfig::default();
///
/// // Load from TOML file
/// // let config = PipelineConfig::from_toml_file("docpipe.toml")?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Hard cap on upload size in bytes. Uploads strictly larger are rejected.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,

    /// Declared MIME types accepted at the validation gate.
    ///
    /// Only consulted when the client declares a type at all; an upload
    /// with no declared type passes this gate.
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_declared_mime_types: Vec<String>,

    /// Root directory stored files land in.
    #[serde(default = "default_storage_root")]
    pub storage_root_path: PathBuf,

    /// Scratch directory for in-flight writes (None = `<storage_root>/.tmp`).
    ///
    /// Must sit on the same filesystem as the storage root, or the final
    /// rename stops being atomic.
    #[serde(default)]
    pub temp_root_path: Option<PathBuf>,

    /// Maximum concurrent ingestions in batch operations (None = num_cpus * 2).
    ///
    /// Limits parallelism to prevent resource exhaustion when processing
    /// large batches. Defaults to twice the number of CPU cores.
    #[serde(default)]
    pub max_concurrent_uploads: Option<usize>,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE_BYTES
}

fn default_allowed_mime_types() -> Vec<String> {
    vec![
        PDF_MIME_TYPE.to_string(),
        DOCX_MIME_TYPE.to_string(),
        PLAIN_TEXT_MIME_TYPE.to_string(),
        MARKDOWN_MIME_TYPE.to_string(),
    ]
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            allowed_declared_mime_types: default_allowed_mime_types(),
            storage_root_path: default_storage_root(),
            temp_root_path: None,
            max_concurrent_uploads: None,
        }
    }
}

impl PipelineConfig {
    /// Effective scratch directory for in-flight writes.
    pub fn temp_root(&self) -> PathBuf {
        self.temp_root_path
            .clone()
            .unwrap_or_else(|| self.storage_root_path.join(".tmp"))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DocpipeError::Validation` if file doesn't exist or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DocpipeError::validation(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            DocpipeError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e))
        })
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DocpipeError::validation(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_yaml_ng::from_str(&content).map_err(|e| {
            DocpipeError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e))
        })
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DocpipeError::validation(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            DocpipeError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e))
        })
    }

    /// Load configuration from a file, dispatching on its extension.
    ///
    /// Supports `.toml`, `.yaml`, `.yml`, and `.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match ext.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(DocpipeError::validation(format!(
                "Unsupported config format for {}: expected .toml, .yaml, .yml, or .json",
                path.display()
            ))),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `docpipe.toml` in the current directory and parent directories.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let cwd = std::env::current_dir().map_err(DocpipeError::Io)?;
        Self::discover_from(&cwd)
    }

    /// Discover configuration starting from an explicit directory.
    pub fn discover_from(start: &Path) -> Result<Option<Self>> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join("docpipe.toml");
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}
