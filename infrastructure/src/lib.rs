//! Infrastructure layer for steward
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod executor;
pub mod export;
pub mod logging;
pub mod persistence;
pub mod planner;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FilePlannerConfig, FileStorageConfig,
};
pub use executor::RandomOutcomeExecutor;
pub use export::FileExportWriter;
pub use logging::JsonlActivityLogger;
pub use persistence::JsonFileStore;
pub use planner::MockPlanner;
