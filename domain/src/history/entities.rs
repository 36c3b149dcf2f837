//! History entries - the append-only activity log of an agent.

use crate::agent::value_objects::{HistoryItemId, TaskId};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who (or what) produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryRole {
    /// A message typed by the user
    User,
    /// A reply authored by the agent itself
    Agent,
    /// Lifecycle notices emitted by the orchestrator
    System,
    /// The invocation sent to a tool
    ToolInput,
    /// The output returned by a tool
    ToolOutput,
}

impl HistoryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryRole::User => "USER",
            HistoryRole::Agent => "AGENT",
            HistoryRole::System => "SYSTEM",
            HistoryRole::ToolInput => "TOOL_INPUT",
            HistoryRole::ToolOutput => "TOOL_OUTPUT",
        }
    }
}

impl std::fmt::Display for HistoryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(HistoryRole::User),
            "AGENT" => Ok(HistoryRole::Agent),
            "SYSTEM" => Ok(HistoryRole::System),
            "TOOL_INPUT" => Ok(HistoryRole::ToolInput),
            "TOOL_OUTPUT" => Ok(HistoryRole::ToolOutput),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// A single immutable entry in an agent's (and optionally a task's) history.
///
/// Entries are shared between the agent-level and task-level logs through
/// `Arc`, so cloning a snapshot never copies entry contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: HistoryItemId,
    /// RFC 3339 timestamp with millisecond precision
    pub timestamp: String,
    pub role: HistoryRole,
    pub content: String,
    /// Weak back-reference to the task this entry is scoped to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

impl HistoryItem {
    /// Creates an entry stamped with the current UTC time.
    pub fn new(role: HistoryRole, content: impl Into<String>) -> Self {
        Self {
            id: HistoryItemId::generate(),
            timestamp: now_rfc3339(),
            role,
            content: content.into(),
            task_id: None,
        }
    }

    /// Scopes the entry to a task.
    pub fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Overrides the timestamp (seed data, imports).
    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// Current UTC time in the format used for every persisted timestamp.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
