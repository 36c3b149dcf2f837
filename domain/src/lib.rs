//! Domain layer for steward
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Agent
//!
//! An agent is a goal decomposed into an ordered list of tool-invoking
//! tasks, plus an append-only activity history. Agents move through a
//! small lifecycle (`IDLE → RUNNING → PAUSED | REPLANNING | FINISHED`).
//!
//! ## Execution
//!
//! [`ExecutionMachine`] is a pure step function over an agent snapshot.
//! The application layer feeds it timer and tool events and forwards the
//! snapshots it produces.

pub mod agent;
pub mod core;
pub mod execution;
pub mod history;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    entities::{Agent, AgentStatus, Task, TaskDescriptor, TaskStatus},
    value_objects::{AgentId, HistoryItemId, TaskId},
};
pub use core::error::DomainError;
pub use execution::{Delay, ExecutionEvent, ExecutionMachine, Halt, Next, ToolOutcome, Transition};
pub use history::{
    ExportedEntry, HistoryItem, HistoryRole, export_file_name, now_rfc3339, parse_export,
    render_export,
};
pub use tool::{
    AgentTemplate, ConfigurationField, FieldKind, Tool, ToolConfiguration, agent_templates,
    default_tools, sample_agents,
};
