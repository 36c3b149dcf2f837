//! Interactive console
//!
//! - [`command`] - line parsing into [`Command`]
//! - [`repl`] - the read-eval-print loop driving the supervisor

pub mod command;
pub mod repl;

pub use command::{Command, CommandError, parse_command};
pub use repl::{AgentConsole, ConsoleError};
