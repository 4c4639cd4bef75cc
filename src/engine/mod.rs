pub mod python;
pub mod types;

use anyhow::Result;

pub use types::{ConvertReply, ConvertRequest, EngineDiag};

/// Boundary to the external document converter. One production
/// implementation ([`python::PythonEngine`]); tests substitute their own.
pub trait Engine {
    fn doctor(&self) -> Result<EngineDiag>;
    fn convert(&self, req: &ConvertRequest) -> Result<ConvertReply>;
}
