//! Execution domain: the pure step machine behind the orchestrator.

pub mod machine;
pub mod outcome;

pub use machine::{Delay, ExecutionEvent, ExecutionMachine, Halt, Next, Transition};
pub use outcome::ToolOutcome;
