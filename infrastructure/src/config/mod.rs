//! Configuration file loading for steward
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `STEWARD_`-prefixed environment variables (`STEWARD_EXECUTION__THINK_MS=0`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./steward.toml` or `./.steward.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/steward/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileExecutionConfig, FileLoggingConfig, FilePlannerConfig,
    FileStorageConfig,
};
pub use loader::ConfigLoader;
