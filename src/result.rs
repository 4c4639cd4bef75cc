use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Read-only key/value snapshot attached to a successful conversion.
pub type Metadata = Map<String, Value>;

/// Outcome of one `process` call. Built exactly once; conversion failures
/// land here as `success = false` instead of an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,
    /// Markdown export of the document.
    pub content: String,
    /// Docling-native document JSON, compact.
    pub json_content: String,
    pub metadata: Metadata,
    pub error_message: Option<String>,
    pub file_path: String,
}

impl ProcessingResult {
    pub fn failed(file_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            json_content: String::new(),
            metadata: Metadata::new(),
            error_message: Some(message.into()),
            file_path: file_path.into(),
        }
    }
}

impl fmt::Display for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "SUCCESS" } else { "FAILED" };
        write!(
            f,
            "ProcessingResult(success={status}, file_path={})",
            self.file_path
        )
    }
}
