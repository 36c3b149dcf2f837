//! Agent domain module
//!
//! Agents, their tasks, status lifecycles and the identifiers that tie
//! history entries back to them.

pub mod entities;
pub mod value_objects;

pub use entities::{Agent, AgentStatus, Task, TaskDescriptor, TaskStatus};
pub use value_objects::{AgentId, HistoryItemId, TaskId};
