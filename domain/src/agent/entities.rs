//! Agent domain entities

use super::value_objects::{AgentId, TaskId};
use crate::core::error::DomainError;
use crate::history::{HistoryItem, HistoryRole, now_rfc3339};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle status of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    /// Created or reset, not executing
    #[default]
    Idle,
    /// The orchestrator is walking the task list
    Running,
    /// Stopped by the user or by an approval gate
    Paused,
    /// A task failed; waiting for a corrective plan
    Replanning,
    /// Every task reached a terminal state
    Finished,
    /// Recovery failed
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "IDLE",
            AgentStatus::Running => "RUNNING",
            AgentStatus::Paused => "PAUSED",
            AgentStatus::Replanning => "REPLANNING",
            AgentStatus::Finished => "FINISHED",
            AgentStatus::Error => "ERROR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentStatus::Idle => "Idle",
            AgentStatus::Running => "Running",
            AgentStatus::Paused => "Paused",
            AgentStatus::Replanning => "Replanning",
            AgentStatus::Finished => "Finished",
            AgentStatus::Error => "Error",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    ///
    /// Staying in the same status is always allowed, as is a reset to IDLE.
    pub fn can_transition_to(&self, to: AgentStatus) -> bool {
        use AgentStatus::*;
        if *self == to || to == Idle {
            return true;
        }
        matches!(
            (self, to),
            (Idle, Running)
                | (Running, Paused)
                | (Running, Replanning)
                | (Running, Finished)
                | (Paused, Running)
                | (Replanning, Running)
                | (Replanning, Error)
        )
    }

    /// FINISHED and ERROR only leave through a reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Finished | AgentStatus::Error)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is waiting to be executed
    #[default]
    Pending,
    /// Task is currently being executed
    InProgress,
    /// Task is blocked on a human decision
    AwaitingApproval,
    /// Task completed successfully
    Completed,
    /// Task failed
    Failed,
    /// Task was denied by the user
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::AwaitingApproval => "AWAITING_APPROVAL",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
            TaskStatus::Skipped => "SKIPPED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped
        )
    }

    /// A task that currently holds the agent's attention.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::InProgress | TaskStatus::AwaitingApproval)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task proposed by a planner, before it is materialized into a [`Task`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub name: String,
    pub description: String,
    pub tool: String,
    pub requires_approval: bool,
}

impl TaskDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        tool: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tool: tool.into(),
            requires_approval: false,
        }
    }

    pub fn with_approval(mut self) -> Self {
        self.requires_approval = true;
        self
    }
}

/// A single step of an agent's plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    /// Name of the tool this step invokes
    pub tool: String,
    pub status: TaskStatus,
    /// Fixed at creation
    pub requires_approval: bool,
    /// Set once a human approved the gate; cleared on reset
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub history: Vec<Arc<HistoryItem>>,
    /// Only present on COMPLETED or FAILED tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Task {
    /// Materializes a planner descriptor with a fresh id.
    pub fn from_descriptor(descriptor: TaskDescriptor) -> Self {
        Self {
            id: TaskId::generate(),
            name: descriptor.name,
            description: descriptor.description,
            tool: descriptor.tool,
            status: TaskStatus::Pending,
            requires_approval: descriptor.requires_approval,
            approved: false,
            history: Vec::new(),
            result: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// The task will stop at an approval gate before executing.
    pub fn needs_approval(&self) -> bool {
        self.requires_approval && !self.approved
    }
}

/// A goal-driven unit with an ordered plan and an activity history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub goal: String,
    pub status: AgentStatus,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub history: Vec<Arc<HistoryItem>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
}

impl Agent {
    /// Creates an IDLE agent with a generated id.
    pub fn new(name: impl Into<String>, goal: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id: AgentId::generate(),
            name: name.into(),
            goal: goal.into(),
            status: AgentStatus::Idle,
            tasks,
            history: Vec::new(),
            tags: Vec::new(),
            created_at: now_rfc3339(),
        }
    }

    pub fn with_id(mut self, id: impl Into<AgentId>) -> Self {
        self.id = id.into();
        self
    }

    /// Appends an agent-level history entry.
    pub fn record(&mut self, role: HistoryRole, content: impl Into<String>) {
        self.history.push(Arc::new(HistoryItem::new(role, content)));
    }

    /// Appends one entry to both the agent log and the task log at `index`.
    pub fn record_for_task(&mut self, index: usize, role: HistoryRole, content: impl Into<String>) {
        let Some(task) = self.tasks.get_mut(index) else {
            return;
        };
        let item = Arc::new(HistoryItem::new(role, content).for_task(task.id.clone()));
        task.history.push(Arc::clone(&item));
        self.history.push(item);
    }

    pub fn task_index(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// First PENDING or IN_PROGRESS task, falling back to 0.
    ///
    /// With the fallback the walk starts at the beginning and skips every
    /// terminal task, FAILED ones included.
    pub fn resume_index(&self) -> usize {
        self.tasks
            .iter()
            .position(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress))
            .unwrap_or(0)
    }

    pub fn first_failed_index(&self) -> Option<usize> {
        self.tasks.iter().position(|t| t.status == TaskStatus::Failed)
    }

    /// The task currently blocked on a human decision, if any.
    pub fn awaiting_approval(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| t.status == TaskStatus::AwaitingApproval)
    }

    /// Number of tasks IN_PROGRESS or AWAITING_APPROVAL (never more than one).
    pub fn active_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status.is_active()).count()
    }

    pub fn transition_to(&mut self, to: AgentStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Replaces every task from `index` onward with fresh tasks.
    pub fn splice_from(&mut self, index: usize, descriptors: Vec<TaskDescriptor>) {
        self.tasks.truncate(index);
        self.tasks
            .extend(descriptors.into_iter().map(Task::from_descriptor));
    }

    /// Appends fresh tasks; returns how many were added.
    pub fn append_tasks(&mut self, descriptors: Vec<TaskDescriptor>) -> usize {
        let before = self.tasks.len();
        self.tasks
            .extend(descriptors.into_iter().map(Task::from_descriptor));
        self.tasks.len() - before
    }

    /// Stops execution state: agent IDLE, non-COMPLETED tasks back to PENDING.
    pub fn reset(&mut self) {
        self.status = AgentStatus::Idle;
        for task in self
            .tasks
            .iter_mut()
            .filter(|t| t.status != TaskStatus::Completed)
        {
            task.status = TaskStatus::Pending;
            task.history.clear();
            task.result = None;
            task.approved = false;
        }
        self.record(
            HistoryRole::System,
            "Agent execution stopped and reset by user.",
        );
    }

    /// Replaces the tag list; blanks are rejected, duplicates dropped.
    pub fn set_tags<I, S>(&mut self, tags: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() || tag.chars().any(char::is_whitespace) {
                return Err(DomainError::InvalidTag(tag.to_string()));
            }
            if !normalized.iter().any(|t| t == tag) {
                normalized.push(tag.to_string());
            }
        }
        self.tags = normalized;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task::from_descriptor(TaskDescriptor::new(id, "desc", "GenericAPI"))
            .with_id(id)
            .with_status(status)
    }

    #[test]
    fn test_agent_status_transitions() {
        use AgentStatus::*;
        assert!(Idle.can_transition_to(Running));
        assert!(Running.can_transition_to(Replanning));
        assert!(Replanning.can_transition_to(Error));
        assert!(Paused.can_transition_to(Running));
        assert!(!Finished.can_transition_to(Running));
        assert!(!Error.can_transition_to(Running));
        assert!(!Idle.can_transition_to(Finished));
        for status in [Idle, Running, Paused, Replanning, Finished, Error] {
            assert!(status.can_transition_to(Idle));
        }
    }

    #[test]
    fn test_transition_to_rejects_invalid() {
        let mut agent = Agent::new("a", "goal", Vec::new());
        agent.status = AgentStatus::Finished;
        let err = agent.transition_to(AgentStatus::Paused).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(agent.status, AgentStatus::Finished);
    }

    #[test]
    fn test_status_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::AwaitingApproval).unwrap(),
            "\"AWAITING_APPROVAL\""
        );
        assert_eq!(
            serde_json::to_string(&AgentStatus::Replanning).unwrap(),
            "\"REPLANNING\""
        );
    }

    #[test]
    fn test_resume_index() {
        let agent = Agent::new(
            "a",
            "goal",
            vec![
                task("t1", TaskStatus::Completed),
                task("t2", TaskStatus::InProgress),
                task("t3", TaskStatus::Pending),
            ],
        );
        assert_eq!(agent.resume_index(), 1);

        let done = Agent::new(
            "a",
            "goal",
            vec![task("t1", TaskStatus::Completed), task("t2", TaskStatus::Failed)],
        );
        assert_eq!(done.resume_index(), 0);
    }

    #[test]
    fn test_record_for_task_shares_entry() {
        let mut agent = Agent::new("a", "goal", vec![task("t1", TaskStatus::Pending)]);
        agent.record_for_task(0, HistoryRole::System, "Task started: t1");

        assert_eq!(agent.history.len(), 1);
        assert_eq!(agent.tasks[0].history.len(), 1);
        assert!(Arc::ptr_eq(&agent.history[0], &agent.tasks[0].history[0]));
        assert_eq!(agent.history[0].task_id.as_ref().unwrap().as_str(), "t1");
    }

    #[test]
    fn test_reset_keeps_completed_tasks() {
        let mut agent = Agent::new(
            "a",
            "goal",
            vec![
                task("t1", TaskStatus::Completed),
                task("t2", TaskStatus::Failed),
                task("t3", TaskStatus::AwaitingApproval),
            ],
        );
        agent.tasks[0].result = Some("ok".to_string());
        agent.tasks[1].result = Some("boom".to_string());
        agent.tasks[2].approved = true;
        agent.record_for_task(0, HistoryRole::System, "done");
        agent.record_for_task(1, HistoryRole::System, "failed");
        agent.status = AgentStatus::Error;

        agent.reset();

        assert_eq!(agent.status, AgentStatus::Idle);
        assert_eq!(agent.tasks[0].status, TaskStatus::Completed);
        assert_eq!(agent.tasks[0].result.as_deref(), Some("ok"));
        assert_eq!(agent.tasks[0].history.len(), 1);
        for t in &agent.tasks[1..] {
            assert_eq!(t.status, TaskStatus::Pending);
            assert!(t.history.is_empty());
            assert!(t.result.is_none());
            assert!(!t.approved);
        }
        let last = agent.history.last().unwrap();
        assert_eq!(last.role, HistoryRole::System);
        assert_eq!(last.content, "Agent execution stopped and reset by user.");
    }

    #[test]
    fn test_splice_preserves_prefix() {
        let mut agent = Agent::new(
            "a",
            "goal",
            vec![
                task("t1", TaskStatus::Completed),
                task("t2", TaskStatus::Failed),
                task("t3", TaskStatus::Pending),
            ],
        );
        agent.splice_from(
            1,
            vec![
                TaskDescriptor::new("fix", "d", "GenericAPI"),
                TaskDescriptor::new("resume", "d", "SlackAPI"),
            ],
        );
        let names: Vec<_> = agent.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["t1", "fix", "resume"]);
        assert!(agent.tasks[1..].iter().all(|t| t.status == TaskStatus::Pending));
        assert_ne!(agent.tasks[1].id, agent.tasks[2].id);
    }

    #[test]
    fn test_set_tags() {
        let mut agent = Agent::new("a", "goal", Vec::new());
        agent.set_tags(["sre", " prod ", "sre"]).unwrap();
        assert_eq!(agent.tags, ["sre", "prod"]);

        assert!(agent.set_tags(["ok", "  "]).is_err());
        assert!(agent.set_tags(["two words"]).is_err());
        assert_eq!(agent.tags, ["sre", "prod"]);
    }

    #[test]
    fn test_agent_json_round_trip_keeps_shared_history() {
        let mut agent = Agent::new("a", "goal", vec![task("t1", TaskStatus::Pending)]);
        agent.record_for_task(0, HistoryRole::ToolInput, "Executing tool GenericAPI with params...");
        let json = serde_json::to_string(&agent).unwrap();
        let back: Agent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, agent);
    }
}
