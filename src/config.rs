use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub processing: DocumentConfig,
    #[serde(default)]
    pub runner: Runner,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            processing: Default::default(),
            runner: Default::default(),
            logging: Default::default(),
        }
    }
}

/// Flat set of knobs forwarded to the Docling pipeline. One instance per
/// processor; replaced wholesale via `PdfProcessor::set_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub extract_tables: bool,
    pub extract_images: bool,
    pub ocr_enabled: bool,
    pub force_ocr: bool,
    /// 0 means no page limit.
    pub max_pages: u32,
    pub pdf_backend: String,
    pub image_export_mode: String,
    pub table_mode: String,
    pub num_threads: u32,
    /// Forwarded to Docling as the per-document timeout hint; this crate
    /// does not enforce it.
    pub timeout_per_document: u64,
    pub ocr_engine: String,
    pub enrich_code: bool,
    pub enrich_formula: bool,
    pub enrich_picture_classes: bool,
    pub enrich_picture_description: bool,
    pub accelerator_device: String,
}
impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            extract_tables: true,
            extract_images: true,
            ocr_enabled: false,
            force_ocr: false,
            max_pages: 0,
            pdf_backend: "dlparse_v4".into(),
            image_export_mode: "embedded".into(),
            table_mode: "accurate".into(),
            num_threads: 4,
            timeout_per_document: 300,
            ocr_engine: "rapidocr".into(),
            enrich_code: false,
            enrich_formula: false,
            enrich_picture_classes: false,
            enrich_picture_description: false,
            accelerator_device: "cpu".into(),
        }
    }
}

impl DocumentConfig {
    /// Lightweight preset: tables on, no page images, no OCR.
    pub fn lightweight() -> Self {
        Self {
            extract_images: false,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub python_exe: String,
    pub scripts_dir: String,
    pub artifacts_dir: String,
    #[serde(default)]
    pub env: std::collections::BTreeMap<String, String>,
    pub keep_stderr: bool,
    /// Hard wall-clock limit on the runner process. 0 waits indefinitely,
    /// leaving `timeout_per_document` as a hint the engine enforces itself.
    pub timeout_seconds: u64,
}
impl Default for Runner {
    fn default() -> Self {
        Self {
            python_exe: "auto".into(),
            scripts_dir: "scripts".into(),
            artifacts_dir: "".into(),
            env: Default::default(),
            keep_stderr: true,
            timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
