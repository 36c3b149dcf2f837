//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing keys fall back to the defaults below.

mod execution;
mod logging;
mod planner;
mod storage;

pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use planner::FilePlannerConfig;
pub use storage::FileStorageConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("execution.success_rate must be between 0 and 1 (got {0})")]
    InvalidSuccessRate(f64),

    #[error("storage.{field} cannot be empty")]
    EmptyPath { field: &'static str },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Phase delays and tool success probability
    pub execution: FileExecutionConfig,
    /// Mock planner behaviour
    pub planner: FilePlannerConfig,
    /// Where agents and exports are written
    pub storage: FileStorageConfig,
    /// Activity and diagnostic logs
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let rate = self.execution.success_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigValidationError::InvalidSuccessRate(rate));
        }
        if self.storage.data_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyPath { field: "data_dir" });
        }
        if self.storage.export_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyPath { field: "export_dir" });
        }
        Ok(())
    }
}
