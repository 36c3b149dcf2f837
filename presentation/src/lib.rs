//! Presentation layer for steward
//!
//! This crate contains CLI definitions, the interactive agent console,
//! output formatters and progress indicators.

pub mod cli;
pub mod console;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use console::AgentConsole;
pub use output::console::ConsoleFormatter;
pub use progress::spinner::PlannerSpinner;
