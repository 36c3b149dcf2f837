//! Export writer port
//!
//! Persists a rendered activity export under a given file name and reports
//! where it ended up.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to write export {file_name}: {source}")]
pub struct ExportError {
    pub file_name: String,
    #[source]
    pub source: std::io::Error,
}

pub trait ExportWriterPort: Send + Sync {
    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, ExportError>;
}
