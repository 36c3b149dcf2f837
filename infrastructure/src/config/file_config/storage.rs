//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
///
/// Paths may start with `~/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding `agents.json`, `tools.json` and `tool-configs.json`
    pub data_dir: Option<String>,
    /// Directory activity exports are written to
    pub export_dir: Option<String>,
}

impl FileStorageConfig {
    /// Configured data directory, else `$XDG_DATA_HOME/steward`, else `./.steward`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => expand_home(dir),
            None => dirs::data_dir()
                .map(|d| d.join("steward"))
                .unwrap_or_else(|| PathBuf::from(".steward")),
        }
    }

    /// Configured export directory, else the working directory.
    pub fn resolve_export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
