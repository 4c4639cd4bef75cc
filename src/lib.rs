//! Thin facade over the Docling document converter: validate a PDF, hand it
//! to the external engine, and normalize the outcome into a
//! [`ProcessingResult`]. All parsing, OCR, and table recognition happens in
//! the engine; this crate only configures, invokes, and records.

pub mod cli;
pub mod config;
pub mod engine;
pub mod options;
pub mod processor;
pub mod result;
pub mod util;

pub use config::{Config, DocumentConfig};
pub use processor::{process_document, DocumentProcessor, PdfProcessor, INVALID_FILE_MESSAGE};
pub use result::{Metadata, ProcessingResult};
