//! File I/O utilities.
//!
//! This module provides async file reading utilities with proper error handling.

use std::path::Path;

use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::error::{DocpipeError, Result};

/// Read a file asynchronously.
///
/// # Arguments
///
/// * `path` - Path to the file to read
///
/// # Returns
///
/// The file contents as bytes.
///
/// # Errors
///
/// Returns `DocpipeError::Io` for I/O errors (these always bubble up).
pub async fn read_file_async(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    fs::read(path.as_ref()).await.map_err(DocpipeError::Io)
}

/// Read at most `max_len` leading bytes of a file.
///
/// Short files yield fewer bytes; the result length is whatever the file
/// actually held, never padded.
///
/// # Errors
///
/// Returns `DocpipeError::Io` for I/O errors (these always bubble up).
pub async fn read_prefix_async(path: impl AsRef<Path>, max_len: usize) -> Result<Vec<u8>> {
    let mut file = fs::File::open(path.as_ref()).await.map_err(DocpipeError::Io)?;
    let mut buf = vec![0u8; max_len];
    let mut filled = 0;

    while filled < buf.len() {
        let n = file
            .read(&mut buf[filled..])
            .await
            .map_err(DocpipeError::Io)?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    buf.truncate(filled);
    Ok(buf)
}
