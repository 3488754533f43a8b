//! Upload ingestion pipeline.
//!
//! This module wires the individual stages into one entry point:
//! validation, durable storage, content-type detection, and text
//! extraction. [`IngestPipeline::ingest`] runs the lifecycle for a single
//! upload; [`IngestPipeline::ingest_batch`] runs it for many uploads
//! concurrently while preserving input order in the report. Both have
//! synchronous wrappers backed by a shared global runtime.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::core::config::PipelineConfig;
use crate::core::mime::detect_content_type;
use crate::core::storage::StorageWriter;
use crate::core::validate::validate_upload;
use crate::error::{DocpipeError, Result};
use crate::extractors::ExtractionDispatcher;
use crate::types::{BatchOutcome, FailedUpload, FileDescriptor, StoredFile, UploadedBlob};

/// Global Tokio runtime for synchronous operations.
///
/// This runtime is lazily initialized on first use and shared across all sync wrappers.
/// Using a global runtime instead of creating one per call provides 100x+ performance improvement.
///
/// # Safety
///
/// The `.expect()` here is justified because:
/// 1. Runtime creation can only fail due to system resource exhaustion (OOM, thread limit)
/// 2. This is a one-time initialization - if it fails, no sync call can ever work
/// 3. Better to fail fast than return errors from every sync operation
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Orchestrates the full upload lifecycle.
///
/// A pipeline owns its configuration, a [`StorageWriter`] rooted at the
/// configured storage directory, and an [`ExtractionDispatcher`]. Clones
/// are cheap and share the configuration and dispatcher, so one pipeline
/// can serve many tasks.
#[derive(Debug, Clone)]
pub struct IngestPipeline {
    config: Arc<PipelineConfig>,
    storage: StorageWriter,
    dispatcher: Arc<ExtractionDispatcher>,
}

impl IngestPipeline {
    /// Create a pipeline with the built-in extraction strategies.
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_dispatcher(config, ExtractionDispatcher::with_default_strategies())
    }

    /// Create a pipeline with a custom dispatcher.
    ///
    /// Use this to register additional [`DocumentExtractor`](crate::extractors::DocumentExtractor)
    /// strategies or to run without PDF support.
    pub fn with_dispatcher(config: PipelineConfig, dispatcher: ExtractionDispatcher) -> Self {
        let storage = StorageWriter::from_config(&config);
        Self {
            config: Arc::new(config),
            storage,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The storage writer backing this pipeline.
    pub fn storage(&self) -> &StorageWriter {
        &self.storage
    }

    /// Ingest a single upload.
    ///
    /// Runs the full lifecycle: validate the upload, write it to durable
    /// storage, detect the stored file's content type, and attempt text
    /// extraction. Extraction problems never fail an ingest; they are
    /// recorded on the descriptor as an `Unavailable` outcome.
    ///
    /// # Errors
    ///
    /// Returns `DocpipeError::Rejected` when the upload fails validation,
    /// before anything touches disk. Storage failures surface as
    /// `DocpipeError::Io` or `DocpipeError::Storage`. If a step after
    /// storage fails, the stored file is removed before the error returns.
    pub async fn ingest(
        &self,
        blob: UploadedBlob,
        target_folder: Option<&str>,
    ) -> Result<FileDescriptor> {
        validate_upload(
            &blob.file_name,
            blob.declared_mime_type.as_deref(),
            blob.byte_length(),
            &self.config,
        )?;

        let stored = self.storage.store(&blob.file_name, &blob.content).await?;

        match self.enrich(&blob, &stored, target_folder).await {
            Ok(descriptor) => Ok(descriptor),
            Err(e) => {
                // A stored file without a descriptor is an orphan; remove it
                // before surfacing the failure.
                if let Err(cleanup_err) = self.storage.delete(&stored.storage_key).await {
                    tracing::warn!(
                        "failed to remove {} after ingest error: {}",
                        stored.storage_key,
                        cleanup_err
                    );
                }
                Err(e)
            }
        }
    }

    /// Detect the content type of a stored file and attach extraction.
    async fn enrich(
        &self,
        blob: &UploadedBlob,
        stored: &StoredFile,
        target_folder: Option<&str>,
    ) -> Result<FileDescriptor> {
        let metadata = tokio::fs::metadata(&stored.path).await?;
        if metadata.len() != stored.size_bytes {
            return Err(DocpipeError::storage(format!(
                "stored size mismatch for {}: wrote {} bytes, found {}",
                stored.storage_key,
                stored.size_bytes,
                metadata.len()
            )));
        }

        let detected_mime_type = detect_content_type(&stored.path).await;
        let extraction = self
            .dispatcher
            .extract(&stored.path, &detected_mime_type, &self.config)
            .await;

        Ok(FileDescriptor {
            name: blob.file_name.clone(),
            detected_mime_type,
            size_bytes: stored.size_bytes,
            storage_key: stored.storage_key.clone(),
            storage_path: stored.path.clone(),
            target_folder: target_folder.map(str::to_owned),
            extraction,
        })
    }

    /// Ingest multiple uploads concurrently.
    ///
    /// Uploads are processed in parallel, automatically managing concurrency
    /// to prevent resource exhaustion. The limit can be configured via
    /// `PipelineConfig::max_concurrent_uploads` or defaults to `num_cpus * 2`.
    /// Per-upload failures do not abort the batch; they are reported in
    /// `BatchOutcome::failed` with a stable reason code. Input order is
    /// preserved within each list of the outcome.
    ///
    /// # Errors
    ///
    /// Returns `DocpipeError::BatchFailed` when every upload in a non-empty
    /// batch failed, and `DocpipeError::Other` if a worker task panics.
    pub async fn ingest_batch(
        &self,
        blobs: Vec<UploadedBlob>,
        target_folder: Option<&str>,
    ) -> Result<BatchOutcome> {
        use tokio::sync::Semaphore;
        use tokio::task::JoinSet;

        if blobs.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let max_concurrent = self
            .config
            .max_concurrent_uploads
            .unwrap_or_else(|| num_cpus::get() * 2);
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let target_folder = target_folder.map(str::to_owned);

        let total = blobs.len();
        let mut tasks = JoinSet::new();

        for (index, blob) in blobs.into_iter().enumerate() {
            let pipeline = self.clone();
            let semaphore_clone = Arc::clone(&semaphore);
            let target = target_folder.clone();

            tasks.spawn(async move {
                let _permit = semaphore_clone.acquire().await.unwrap();
                let file_name = blob.file_name.clone();
                let result = pipeline.ingest(blob, target.as_deref()).await;
                (index, file_name, result)
            });
        }

        let mut slots: Vec<Option<std::result::Result<FileDescriptor, FailedUpload>>> =
            vec![None; total];

        while let Some(task_result) = tasks.join_next().await {
            match task_result {
                Ok((index, _, Ok(descriptor))) => {
                    slots[index] = Some(Ok(descriptor));
                }
                Ok((index, file_name, Err(e))) => {
                    tracing::warn!("batch upload {} failed: {}", file_name, e);
                    slots[index] = Some(Err(FailedUpload {
                        file_name,
                        reason_code: e.reason_code().to_string(),
                        detail: e.to_string(),
                    }));
                }
                Err(join_err) => {
                    return Err(DocpipeError::Other(format!(
                        "ingest task panicked: {}",
                        join_err
                    )));
                }
            }
        }

        let mut outcome = BatchOutcome::default();
        #[allow(clippy::unwrap_used)]
        for slot in slots {
            match slot.unwrap() {
                Ok(descriptor) => outcome.succeeded.push(descriptor),
                Err(failure) => outcome.failed.push(failure),
            }
        }

        if outcome.succeeded.is_empty() {
            tracing::warn!("all {} uploads in batch failed", total);
            return Err(DocpipeError::BatchFailed {
                failures: outcome.failed,
            });
        }

        Ok(outcome)
    }

    /// Synchronous wrapper for [`IngestPipeline::ingest`].
    ///
    /// Blocks the current thread until ingestion completes. Uses the shared
    /// global runtime instead of creating one per call. Must not be called
    /// from inside an async context; use `ingest` there instead.
    pub fn ingest_sync(
        &self,
        blob: UploadedBlob,
        target_folder: Option<&str>,
    ) -> Result<FileDescriptor> {
        GLOBAL_RUNTIME.block_on(self.ingest(blob, target_folder))
    }

    /// Synchronous wrapper for [`IngestPipeline::ingest_batch`].
    ///
    /// Uses the shared global runtime instead of creating one per call.
    pub fn ingest_batch_sync(
        &self,
        blobs: Vec<UploadedBlob>,
        target_folder: Option<&str>,
    ) -> Result<BatchOutcome> {
        GLOBAL_RUNTIME.block_on(self.ingest_batch(blobs, target_folder))
    }
}
