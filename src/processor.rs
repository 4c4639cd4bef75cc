use crate::{
    config::{Config, DocumentConfig},
    engine::{python::PythonEngine, ConvertReply, ConvertRequest, Engine},
    options::PipelineOptions,
    result::{Metadata, ProcessingResult},
};
use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

/// Fixed message carried by results that failed validation.
pub const INVALID_FILE_MESSAGE: &str = "Invalid file";

const SUPPORTED_EXTENSIONS: &[&str] = &["pdf"];

pub trait DocumentProcessor {
    /// Pure predicate: exists, is a regular file, has a supported extension.
    fn validate_file(&self, path: &Path) -> bool;
    /// Converts one document. Infallible at the signature level; every
    /// failure mode is folded into the returned record.
    fn process(&self, path: &Path) -> ProcessingResult;
}

pub struct PdfProcessor<E: Engine> {
    config: DocumentConfig,
    options: PipelineOptions,
    engine: E,
}

impl PdfProcessor<PythonEngine> {
    pub fn new(cfg: &Config) -> Result<Self> {
        let engine = PythonEngine::new(cfg)?;
        Self::with_engine(&cfg.processing, engine)
    }
}

impl<E: Engine> PdfProcessor<E> {
    /// Fails fast on an unrecognized OCR engine name, before any
    /// conversion is attempted.
    pub fn with_engine(config: &DocumentConfig, engine: E) -> Result<Self> {
        let options = PipelineOptions::from_config(config)?;
        Ok(Self {
            config: config.clone(),
            options,
            engine,
        })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Replaces the config and rebuilds the pipeline options.
    pub fn set_config(&mut self, config: DocumentConfig) -> Result<()> {
        self.options = PipelineOptions::from_config(&config)?;
        self.config = config;
        Ok(())
    }

    /// Converts every PDF directly under `dir`, sequentially, in filesystem
    /// enumeration order. Unlike `process`, a missing or non-directory path
    /// is an error here rather than a failed result.
    pub fn process_directory(&self, dir: &Path) -> Result<Vec<ProcessingResult>> {
        if !dir.is_dir() {
            return Err(anyhow!(
                "directory {} does not exist or is not a directory",
                dir.display()
            ));
        }

        let mut results = Vec::new();
        for entry in
            std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?
        {
            let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
            let path = entry.path();
            if path.is_file() && has_supported_extension(&path) {
                results.push(self.process(&path));
            }
        }
        Ok(results)
    }

    fn try_convert(&self, path: &Path) -> Result<ProcessingResult> {
        let req = ConvertRequest {
            input_pdf: path.display().to_string(),
            options: self.options.clone(),
        };
        let reply = self
            .engine
            .convert(&req)
            .with_context(|| format!("converting {}", path.display()))?;

        if !reply.ok {
            let detail = reply
                .error
                .clone()
                .unwrap_or_else(|| "unknown engine error".to_string());
            return Err(anyhow!("engine reported failure: {detail}"));
        }

        let json_content = serde_json::to_string(&reply.document)
            .with_context(|| "serializing document JSON")?;
        let metadata = metadata_snapshot(path, &reply)?;

        info!(
            "converted {} pages={} confidence={:.3}",
            path.display(),
            reply.num_pages,
            reply.confidence
        );

        Ok(ProcessingResult {
            success: true,
            content: reply.markdown,
            json_content,
            metadata,
            error_message: None,
            file_path: path.display().to_string(),
        })
    }
}

impl<E: Engine> DocumentProcessor for PdfProcessor<E> {
    fn validate_file(&self, path: &Path) -> bool {
        path.is_file() && has_supported_extension(path)
    }

    fn process(&self, path: &Path) -> ProcessingResult {
        if !self.validate_file(path) {
            return ProcessingResult::failed(path.display().to_string(), INVALID_FILE_MESSAGE);
        }

        match self.try_convert(path) {
            Ok(result) => result,
            Err(err) => {
                warn!("conversion failed for {}: {err:#}", path.display());
                ProcessingResult::failed(
                    path.display().to_string(),
                    format!("Error processing {}: {err:#}", path.display()),
                )
            }
        }
    }
}

/// One-shot convenience: build a processor from `cfg` and convert `path`.
pub fn process_document(cfg: &Config, path: &Path) -> Result<ProcessingResult> {
    let processor = PdfProcessor::new(cfg)?;
    Ok(processor.process(path))
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
        .unwrap_or(false)
}

fn metadata_snapshot(path: &Path, reply: &ConvertReply) -> Result<Metadata> {
    let stat = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;

    let mut meta = Metadata::new();
    meta.insert(
        "file_name".into(),
        json!(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()),
    );
    meta.insert("file_size".into(), json!(stat.len()));
    meta.insert(
        "file_extension".into(),
        json!(path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()),
    );
    meta.insert("file_path".into(), json!(path.display().to_string()));
    meta.insert("num_pages".into(), json!(reply.num_pages));
    meta.insert("confidence_score".into(), json!(reply.confidence));
    if let Some(doc_meta) = &reply.document_metadata {
        meta.insert("document_metadata".into(), json!(doc_meta));
    }
    Ok(meta)
}
