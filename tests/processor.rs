use anyhow::Result;
use docling_bridge::{
    config::DocumentConfig,
    engine::{ConvertReply, ConvertRequest, Engine, EngineDiag},
    DocumentProcessor, PdfProcessor, INVALID_FILE_MESSAGE,
};
use serde_json::json;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Ok,
    /// convert() returns Err.
    Fail,
    /// convert() returns a reply with ok=false, the way the runner reports
    /// a conversion traceback.
    SoftFail,
}

struct MockEngine {
    mode: Mode,
}

impl Engine for MockEngine {
    fn doctor(&self) -> Result<EngineDiag> {
        Ok(EngineDiag {
            python_exe: "mock".into(),
            python_version: "3.12.0".into(),
            docling_version: Some("2.0.0".into()),
            ok: true,
            error: None,
        })
    }

    fn convert(&self, _req: &ConvertRequest) -> Result<ConvertReply> {
        if self.mode == Mode::Fail {
            anyhow::bail!("engine exploded");
        }
        if self.mode == Mode::SoftFail {
            return Ok(ConvertReply {
                ok: false,
                markdown: String::new(),
                document: serde_json::Value::Null,
                num_pages: 0,
                confidence: 0.0,
                document_metadata: None,
                error: Some("RuntimeError: model crashed\nTraceback: ...".into()),
            });
        }
        Ok(ConvertReply {
            ok: true,
            markdown: "# Title\n\nBody".into(),
            document: json!({"schema_name": "DoclingDocument"}),
            num_pages: 3,
            confidence: 0.91,
            document_metadata: None,
            error: None,
        })
    }
}

fn processor(mode: Mode) -> PdfProcessor<MockEngine> {
    PdfProcessor::with_engine(&DocumentConfig::default(), MockEngine { mode }).unwrap()
}

#[test]
fn nonexistent_path_returns_failed_result() {
    let r = processor(Mode::Ok).process(Path::new("does/not/exist.pdf"));
    assert!(!r.success);
    assert_eq!(r.error_message.as_deref(), Some(INVALID_FILE_MESSAGE));
    assert!(r.content.is_empty());
    assert!(r.json_content.is_empty());
    assert!(r.metadata.is_empty());
}

#[test]
fn non_pdf_extension_returns_failed_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "hello").unwrap();

    let p = processor(Mode::Ok);
    assert!(!p.validate_file(&path));
    let r = p.process(&path);
    assert!(!r.success);
    assert_eq!(r.error_message.as_deref(), Some(INVALID_FILE_MESSAGE));
}

#[test]
fn directory_path_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("looks_like.pdf");
    fs::create_dir(&sub).unwrap();
    assert!(!processor(Mode::Ok).validate_file(&sub));
}

#[test]
fn valid_pdf_yields_content_and_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"%PDF-1.4 stub").unwrap();

    let r = processor(Mode::Ok).process(&path);
    assert!(r.success, "{:?}", r.error_message);
    assert!(!r.content.is_empty());
    assert!(!r.json_content.is_empty());
    assert!(r.error_message.is_none());

    for key in ["file_name", "file_size", "num_pages"] {
        assert!(r.metadata.contains_key(key), "missing metadata key {key}");
    }
    assert_eq!(r.metadata["file_name"], json!("doc.pdf"));
    assert_eq!(r.metadata["file_extension"], json!(".pdf"));
    assert_eq!(r.metadata["num_pages"], json!(3));
    assert_eq!(r.metadata["file_size"], json!(13));
}

#[test]
fn engine_failure_is_folded_into_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"%PDF-1.4 stub").unwrap();

    let r = processor(Mode::Fail).process(&path);
    assert!(!r.success);
    let msg = r.error_message.unwrap();
    assert!(msg.starts_with("Error processing"));
    assert!(msg.contains("engine exploded"));
    assert!(r.content.is_empty());
}

#[test]
fn engine_soft_failure_carries_runner_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"%PDF-1.4 stub").unwrap();

    let r = processor(Mode::SoftFail).process(&path);
    assert!(!r.success);
    let msg = r.error_message.unwrap();
    assert!(msg.contains("model crashed"));
    assert!(msg.contains("Traceback"));
}

#[test]
fn batch_processes_only_matching_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.pdf", "b.PDF", "c.txt", "d.md"] {
        fs::write(dir.path().join(name), b"stub").unwrap();
    }

    let results = processor(Mode::Ok).process_directory(dir.path()).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
}

#[test]
fn missing_directory_is_an_error_not_an_empty_list() {
    let err = processor(Mode::Ok).process_directory(Path::new("no/such/dir"));
    assert!(err.is_err());
}

#[test]
fn file_path_is_not_a_directory_for_batch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    fs::write(&path, b"stub").unwrap();
    assert!(processor(Mode::Ok).process_directory(&path).is_err());
}

#[test]
fn config_round_trips_through_getter() {
    let cfg = DocumentConfig {
        num_threads: 9,
        accelerator_device: "gpu".into(),
        ocr_enabled: true,
        ..Default::default()
    };
    let p = PdfProcessor::with_engine(&cfg, MockEngine { mode: Mode::Ok }).unwrap();
    assert_eq!(p.config(), &cfg);
}

#[test]
fn unknown_ocr_engine_fails_construction() {
    let cfg = DocumentConfig {
        ocr_engine: "easyocr".into(),
        ..Default::default()
    };
    assert!(PdfProcessor::with_engine(&cfg, MockEngine { mode: Mode::Ok }).is_err());
}

#[test]
fn set_config_rejects_bad_engine_and_keeps_old_config() {
    let mut p = processor(Mode::Ok);
    let bad = DocumentConfig {
        ocr_engine: "easyocr".into(),
        ..Default::default()
    };
    assert!(p.set_config(bad).is_err());
    assert_eq!(p.config().ocr_engine, "rapidocr");

    let good = DocumentConfig {
        ocr_engine: "tesseract".into(),
        ..Default::default()
    };
    p.set_config(good.clone()).unwrap();
    assert_eq!(p.config(), &good);
}
