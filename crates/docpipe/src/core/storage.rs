//! Durable storage for validated uploads.
//!
//! Files land under a generated, collision-free key that keeps the original
//! extension (lowercased) so extension-based type detection still works on
//! the stored copy. Writes go to a scratch directory first and reach the
//! final path via rename, so readers never observe a partially written file.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::core::config::PipelineConfig;
use crate::error::{DocpipeError, Result};
use crate::types::StoredFile;

/// Longest extension carried onto a storage key.
const MAX_KEY_EXTENSION_LEN: usize = 16;

/// Writes uploads into the storage root.
///
/// Cloning is cheap; clones share nothing but the two configured paths.
#[derive(Debug, Clone)]
pub struct StorageWriter {
    root: PathBuf,
    temp_root: PathBuf,
}

impl StorageWriter {
    pub fn new(root: impl Into<PathBuf>, temp_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            temp_root: temp_root.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.storage_root_path.clone(), config.temp_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a blob under a fresh key.
    ///
    /// The bytes are written to the scratch directory and renamed into
    /// place. On any failure the scratch file is removed, so no partial
    /// artifact survives under the final path or the temp root.
    ///
    /// # Errors
    ///
    /// Returns `DocpipeError::Storage` when directories cannot be created
    /// or when the write or rename fails.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let storage_key = generate_storage_key(original_name);
        let final_path = self.root.join(&storage_key);
        let temp_path = self.temp_root.join(format!("{storage_key}.part"));

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            DocpipeError::storage_with_source(
                format!("failed to create storage root {}", self.root.display()),
                e,
            )
        })?;
        tokio::fs::create_dir_all(&self.temp_root).await.map_err(|e| {
            DocpipeError::storage_with_source(
                format!("failed to create temp root {}", self.temp_root.display()),
                e,
            )
        })?;

        let guard = TempFileGuard::new(temp_path.clone());

        tokio::fs::write(&temp_path, bytes).await.map_err(|e| {
            DocpipeError::storage_with_source(format!("failed to write {}", temp_path.display()), e)
        })?;
        tokio::fs::rename(&temp_path, &final_path).await.map_err(|e| {
            DocpipeError::storage_with_source(
                format!(
                    "failed to move {} into place as {}",
                    temp_path.display(),
                    final_path.display()
                ),
                e,
            )
        })?;

        guard.disarm();
        tracing::debug!("stored {} bytes under key {}", bytes.len(), storage_key);

        Ok(StoredFile {
            storage_key,
            path: final_path,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Remove a stored file by key.
    ///
    /// Returns `Ok(true)` when a file was removed and `Ok(false)` when no
    /// file existed under the key, so repeated deletes are safe.
    ///
    /// # Errors
    ///
    /// Returns `DocpipeError::Validation` for keys that are not bare file
    /// names, and `DocpipeError::Storage` for filesystem failures other
    /// than the file being absent.
    pub async fn delete(&self, storage_key: &str) -> Result<bool> {
        validate_storage_key(storage_key)?;
        let path = self.root.join(storage_key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DocpipeError::storage_with_source(
                format!("failed to delete {}", path.display()),
                e,
            )),
        }
    }
}

/// Keys never contain separators or traversal, only what this module
/// generates. Anything else is a caller bug, not a lookup miss.
fn validate_storage_key(storage_key: &str) -> Result<()> {
    if storage_key.is_empty() || storage_key.contains(['/', '\\']) || storage_key.contains("..") {
        return Err(DocpipeError::validation(format!(
            "malformed storage key: {storage_key:?}"
        )));
    }
    Ok(())
}

fn generate_storage_key(original_name: &str) -> String {
    let id = Uuid::new_v4().simple();
    match sanitized_extension(original_name) {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Extension carried over from the original name, if it is plain enough.
///
/// Only short ASCII-alphanumeric extensions survive; everything else is
/// dropped rather than sanitized, since the key must stay path-safe.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty()
        || ext.len() > MAX_KEY_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Removes the scratch file on drop unless the rename succeeded.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
