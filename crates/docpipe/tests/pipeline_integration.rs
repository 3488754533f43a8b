//! End-to-end ingestion tests.
//!
//! Each test drives the full lifecycle through `IngestPipeline`: validation,
//! durable storage, content-type detection, and text extraction, against a
//! throwaway storage root.

use docpipe::{ExtractionOutcome, UploadedBlob};
use tempfile::TempDir;

mod helpers;
use helpers::{build_docx, build_pdf, test_pipeline};

/// Text uploads come back byte-exact, trailing newline included.
#[tokio::test]
async fn test_text_upload_round_trip() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let content = "line one\nline two\n";
    let blob = UploadedBlob::new(
        "notes.txt",
        Some("text/plain".to_string()),
        content.as_bytes().to_vec(),
    );
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(descriptor.name, "notes.txt");
    assert_eq!(descriptor.detected_mime_type, "text/plain");
    assert_eq!(descriptor.extraction, ExtractionOutcome::text(content));

    let on_disk = std::fs::read(&descriptor.storage_path).unwrap();
    assert_eq!(on_disk, content.as_bytes());
}

/// PDF pages are extracted in document order.
#[tokio::test]
async fn test_pdf_upload_extracts_pages_in_order() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let bytes = build_pdf(&["Alpha page", "Bravo page", "Charlie page"]);
    let blob = UploadedBlob::new("report.pdf", Some("application/pdf".to_string()), bytes);
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(descriptor.detected_mime_type, "application/pdf");
    let text = descriptor
        .extraction
        .as_text()
        .expect("PDF extraction should produce text");
    let alpha = text.find("Alpha page").expect("first page missing");
    let bravo = text.find("Bravo page").expect("second page missing");
    let charlie = text.find("Charlie page").expect("third page missing");
    assert!(alpha < bravo, "pages out of order: {}", text);
    assert!(bravo < charlie, "pages out of order: {}", text);
}

/// A PDF uploaded with a text name and declared type is still treated as a PDF.
#[tokio::test]
async fn test_detection_overrides_declared_type() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let bytes = build_pdf(&["Hidden pdf body"]);
    let blob = UploadedBlob::new("misnamed.txt", Some("text/plain".to_string()), bytes);
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(descriptor.detected_mime_type, "application/pdf");
    let text = descriptor
        .extraction
        .as_text()
        .expect("content should route to the PDF strategy");
    assert!(text.contains("Hidden pdf body"));
}

/// DOCX body paragraphs come first, table cells after, row-major.
#[tokio::test]
async fn test_docx_upload_extracts_paragraphs_and_tables() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let body = "<w:p><w:r><w:t>Intro paragraph.</w:t></w:r></w:p>\
                <w:tbl><w:tr>\
                <w:tc><w:p><w:r><w:t>Cell one</w:t></w:r></w:p></w:tc>\
                <w:tc><w:p><w:r><w:t>Cell two</w:t></w:r></w:p></w:tc>\
                </w:tr></w:tbl>";
    let blob = UploadedBlob::new("memo.docx", None, build_docx(body));
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(
        descriptor.detected_mime_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(
        descriptor.extraction,
        ExtractionOutcome::text("Intro paragraph.\nCell one\nCell two")
    );
}

/// Bytes nothing can extract still ingest successfully.
#[tokio::test]
async fn test_unknown_bytes_succeed_without_extraction() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let blob = UploadedBlob::new("payload.bin", None, vec![0x00, 0x01, 0xFE, 0xFF, 0x42, 0x13, 0x37]);
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(descriptor.detected_mime_type, "application/octet-stream");
    assert_eq!(
        descriptor.extraction,
        ExtractionOutcome::unavailable("unsupported mime type: application/octet-stream")
    );
    assert!(descriptor.storage_path.exists(), "payload should still be stored");
}

/// Non-UTF-8 text uploads fall back to a lossless legacy decoding.
#[tokio::test]
async fn test_latin1_text_upload_decodes() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let blob = UploadedBlob::new("latin.txt", None, b"caf\xE9 cr\xE8me".to_vec());
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(descriptor.detected_mime_type, "text/plain");
    assert_eq!(descriptor.extraction, ExtractionOutcome::text("café crème"));
}

/// Markdown routes through the plain-text strategy.
#[tokio::test]
async fn test_markdown_detected_and_extracted() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let content = "# Title\n\nBody text.\n";
    let blob = UploadedBlob::new("README.md", None, content.as_bytes().to_vec());
    let descriptor = pipeline.ingest(blob, None).await.unwrap();

    assert_eq!(descriptor.detected_mime_type, "text/markdown");
    assert_eq!(descriptor.extraction, ExtractionOutcome::text(content));
}

/// The descriptor's storage fields agree with what is on disk.
#[tokio::test]
async fn test_descriptor_matches_stored_bytes() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let payload = b"stored payload".to_vec();
    let blob = UploadedBlob::new("data.txt", None, payload.clone());
    let descriptor = pipeline.ingest(blob, Some("projects/demo")).await.unwrap();

    assert_eq!(descriptor.name, "data.txt");
    assert_eq!(descriptor.size_bytes, payload.len() as u64);
    assert_eq!(descriptor.target_folder.as_deref(), Some("projects/demo"));
    assert!(descriptor.storage_path.starts_with(pipeline.storage().root()));
    assert!(descriptor.storage_path.ends_with(&descriptor.storage_key));
    assert!(
        descriptor.storage_key.ends_with(".txt"),
        "key should keep the sanitized extension: {}",
        descriptor.storage_key
    );

    let on_disk = std::fs::read(&descriptor.storage_path).unwrap();
    assert_eq!(on_disk, payload);
}

/// Sync wrappers cover both single and batch ingestion.
#[test]
fn test_sync_wrappers_round_trip() {
    let dir = TempDir::new().unwrap();
    let pipeline = test_pipeline(dir.path());

    let blob = UploadedBlob::new("sync.txt", None, b"sync path".to_vec());
    let descriptor = pipeline.ingest_sync(blob, None).unwrap();
    assert_eq!(descriptor.extraction, ExtractionOutcome::text("sync path"));

    let batch = pipeline
        .ingest_batch_sync(vec![UploadedBlob::new("b.txt", None, b"b".to_vec())], None)
        .unwrap();
    assert_eq!(batch.succeeded.len(), 1);
    assert!(batch.failed.is_empty());
}
