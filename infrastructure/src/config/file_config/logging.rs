//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write every history entry to `<data_dir>/activity.jsonl`
    pub activity_log: bool,
    /// Directory for daily diagnostic log files
    pub log_dir: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            activity_log: true,
            log_dir: None,
        }
    }
}
