//! Core types shared across the ingestion pipeline.
//!
//! Everything a caller hands in or gets back lives here: the in-memory
//! upload, the stored-file receipt, the extraction outcome attached to a
//! descriptor, and the per-batch report types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An upload held fully in memory, before validation or storage.
///
/// `declared_mime_type` is whatever the client claimed (for example the
/// `Content-Type` of a multipart part) and is only ever used for the
/// allow-list gate. The type recorded on the final descriptor comes from
/// content detection, never from this field.
#[derive(Clone)]
pub struct UploadedBlob {
    pub file_name: String,
    pub declared_mime_type: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedBlob {
    pub fn new(
        file_name: impl Into<String>,
        declared_mime_type: Option<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            declared_mime_type,
            content,
        }
    }

    pub fn byte_length(&self) -> u64 {
        self.content.len() as u64
    }
}

impl std::fmt::Debug for UploadedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedBlob")
            .field("file_name", &self.file_name)
            .field("declared_mime_type", &self.declared_mime_type)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// Receipt for a blob that reached durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Collision-free key the file is retrievable under.
    pub storage_key: String,
    /// Final on-disk location.
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Result of attempting text extraction on a stored file.
///
/// Extraction never fails an upload. A file the pipeline cannot get text
/// out of still produces a descriptor, just with an `Unavailable` outcome
/// explaining why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    Text { content: String },
    Unavailable { reason: String },
}

impl ExtractionOutcome {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Everything the pipeline knows about one successfully ingested file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Original client-supplied file name.
    pub name: String,
    /// MIME type per content detection, not the client's claim.
    pub detected_mime_type: String,
    pub size_bytes: u64,
    pub storage_key: String,
    pub storage_path: PathBuf,
    /// Opaque destination token passed through from the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_folder: Option<String>,
    pub extraction: ExtractionOutcome,
}

/// One file that did not survive ingestion, with a stable reason code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedUpload {
    pub file_name: String,
    pub reason_code: String,
    pub detail: String,
}

/// Partial-success report for a batch upload.
///
/// Input order is preserved within each list: `succeeded[0]` is the first
/// input file that succeeded, `failed[0]` the first that failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<FileDescriptor>,
    pub failed: Vec<FailedUpload>,
}
