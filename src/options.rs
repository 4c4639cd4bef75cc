use crate::config::DocumentConfig;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngine {
    Rapidocr,
    Tesserocr,
    Tesseract,
}

impl OcrEngine {
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rapidocr" => Ok(Self::Rapidocr),
            "tesserocr" => Ok(Self::Tesserocr),
            "tesseract" => Ok(Self::Tesseract),
            other => bail!(
                "unknown OCR engine: {other}. Supported: rapidocr, tesserocr, tesseract"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceleratorDevice {
    Auto,
    Cpu,
    Gpu,
}

impl AcceleratorDevice {
    /// Unknown names fall back to `Auto` rather than erroring.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "cpu" => Self::Cpu,
            "gpu" => Self::Gpu,
            _ => Self::Auto,
        }
    }
}

/// Options shape handed to the runner, mirroring Docling's
/// `PdfPipelineOptions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub do_table_structure: bool,
    pub do_ocr: bool,
    pub generate_page_images: bool,
    pub do_cell_matching: bool,
    pub table_mode: String,
    pub document_timeout_seconds: u64,
    pub max_pages: u32,
    pub pdf_backend: String,
    pub image_export_mode: String,
    pub do_code_enrichment: bool,
    pub do_formula_enrichment: bool,
    pub do_picture_classification: bool,
    pub do_picture_description: bool,
    pub accelerator: AcceleratorOptions,
    pub ocr: OcrOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceleratorOptions {
    pub device: AcceleratorDevice,
    pub num_threads: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOptions {
    pub engine: OcrEngine,
    pub force_full_page_ocr: bool,
}

impl PipelineOptions {
    pub fn from_config(cfg: &DocumentConfig) -> Result<Self> {
        // Validated even with OCR disabled so a misspelled engine name
        // fails at processor construction, not mid-batch after enabling OCR.
        let engine = OcrEngine::parse(&cfg.ocr_engine)?;

        Ok(Self {
            do_table_structure: cfg.extract_tables,
            do_ocr: cfg.ocr_enabled,
            generate_page_images: cfg.extract_images,
            do_cell_matching: true,
            table_mode: cfg.table_mode.clone(),
            document_timeout_seconds: cfg.timeout_per_document,
            max_pages: cfg.max_pages,
            pdf_backend: cfg.pdf_backend.clone(),
            image_export_mode: cfg.image_export_mode.clone(),
            do_code_enrichment: cfg.enrich_code,
            do_formula_enrichment: cfg.enrich_formula,
            do_picture_classification: cfg.enrich_picture_classes,
            do_picture_description: cfg.enrich_picture_description,
            accelerator: AcceleratorOptions {
                device: AcceleratorDevice::parse(&cfg.accelerator_device),
                num_threads: cfg.num_threads,
            },
            ocr: OcrOptions {
                engine,
                force_full_page_ocr: cfg.force_ocr,
            },
        })
    }
}
