use crate::options::PipelineOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDiag {
    pub python_exe: String,
    pub python_version: String,
    pub docling_version: Option<String>,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub input_pdf: String,
    pub options: PipelineOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertReply {
    pub ok: bool,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub document: serde_json::Value,
    #[serde(default)]
    pub num_pages: u32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub document_metadata: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
