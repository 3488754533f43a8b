//! Shared helpers for docpipe integration tests.
//!
//! Provides pipeline construction against a throwaway storage root and
//! in-memory builders for small PDF and DOCX fixtures, so tests do not
//! depend on checked-in binary documents.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use docpipe::{IngestPipeline, PipelineConfig};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use zip::write::SimpleFileOptions;

/// Pipeline configuration rooted inside a throwaway directory.
pub fn test_config(root: &Path) -> PipelineConfig {
    PipelineConfig {
        storage_root_path: root.join("stored"),
        ..PipelineConfig::default()
    }
}

/// Pipeline writing into `<root>/stored`, with every default strategy enabled.
pub fn test_pipeline(root: &Path) -> IngestPipeline {
    IngestPipeline::new(test_config(root))
}

/// Count regular files under the storage root, ignoring the scratch directory.
///
/// Returns 0 when the root does not exist yet, which is the case when
/// nothing has been stored.
pub fn stored_file_count(storage_root: &Path) -> usize {
    let entries = match std::fs::read_dir(storage_root) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count()
}

/// Leftover scratch files under the temp root, `.part` files included.
pub fn scratch_file_paths(storage_root: &Path) -> Vec<PathBuf> {
    let temp_root = storage_root.join(".tmp");
    let entries = match std::fs::read_dir(&temp_root) {
        Ok(entries) => entries,
        Err(_) => return vec![],
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect()
}

/// Build a minimal single-font PDF with one page per entry in `pages`.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let kid_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => kid_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Build a minimal DOCX archive whose `word/document.xml` body is `body`.
///
/// `body` is the raw WordprocessingML inside `<w:body>`, for example
/// `<w:p><w:r><w:t>Hello</w:t></w:r></w:p>`.
///
/// The archive follows the standard OOXML package layout
/// (`[Content_Types].xml`, `_rels/.rels`, then the `word/` parts) so that
/// content sniffers recognize it as a Word document rather than a bare zip.
pub fn build_docx(body: &str) -> Vec<u8> {
    let document_xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut buf = Vec::new();
    {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        let options = SimpleFileOptions::default();

        writer.start_file("[Content_Types].xml", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                  <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
                  <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
                  <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
                  <Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
                  </Types>",
            )
            .unwrap();

        writer.start_file("_rels/.rels", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                  <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                  <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
                  </Relationships>",
            )
            .unwrap();

        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();

        writer.start_file("word/_rels/document.xml.rels", options).unwrap();
        writer
            .write_all(
                b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                  <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\"/>",
            )
            .unwrap();
        writer.finish().unwrap();
    }
    buf
}
