//! Domain error types

use crate::agent::entities::{AgentStatus, TaskStatus};
use crate::agent::value_objects::TaskId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: AgentStatus, to: AgentStatus },

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task {task} is {status}, not awaiting approval")]
    TaskNotAwaitingApproval { task: TaskId, status: TaskStatus },

    #[error("Task {0} is waiting for human approval")]
    ApprovalPending(TaskId),

    #[error("No failed task to replan from")]
    NoFailedTask,

    #[error("Agent must be RUNNING to execute, but is {0}")]
    NotRunning(AgentStatus),

    #[error("Unexpected event {event} while {stage}")]
    UnexpectedEvent {
        stage: &'static str,
        event: &'static str,
    },

    #[error("Goal must be at least {min} characters (got {actual})")]
    GoalTooShort { min: usize, actual: usize },

    #[error("Goal must be at most {max} characters (got {actual})")]
    GoalTooLong { max: usize, actual: usize },

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Tool {tool} has no configuration field named {field}")]
    UnknownConfigurationField { tool: String, field: String },

    #[error("Unknown history role: {0}")]
    UnknownRole(String),

    #[error("Malformed export at line {line}: {reason}")]
    MalformedExport { line: usize, reason: String },
}

impl DomainError {
    /// Whether the error reflects bad user input rather than broken state
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::GoalTooShort { .. }
                | DomainError::GoalTooLong { .. }
                | DomainError::EmptyMessage
                | DomainError::InvalidTag(_)
                | DomainError::UnknownConfigurationField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: AgentStatus::Finished,
            to: AgentStatus::Running,
        };
        assert_eq!(error.to_string(), "Invalid status transition: FINISHED -> RUNNING");
    }

    #[test]
    fn test_is_validation_check() {
        assert!(DomainError::EmptyMessage.is_validation());
        assert!(DomainError::InvalidTag(" ".to_string()).is_validation());
        assert!(!DomainError::NoFailedTask.is_validation());
    }
}
