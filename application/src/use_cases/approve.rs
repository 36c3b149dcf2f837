//! Approve Task use case
//!
//! Resolves an approval gate. Approving re-queues the task (it will execute
//! without asking again); denying skips it. Either way the agent goes back
//! to RUNNING and execution restarts from the resulting snapshot.

use super::orchestrate::{ExecutionOrchestrator, RunHandle};
use crate::ports::update_sink::AgentUpdateSink;
use std::sync::Arc;
use steward_domain::{Agent, AgentStatus, DomainError, HistoryRole, TaskId, TaskStatus};
use tracing::info;

/// A human's answer to an approval gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Deny,
}

impl ApprovalDecision {
    pub fn as_str(&self) -> &str {
        match self {
            ApprovalDecision::Approve => "approved",
            ApprovalDecision::Deny => "denied",
        }
    }
}

pub struct ApproveTaskUseCase {
    orchestrator: ExecutionOrchestrator,
}

impl ApproveTaskUseCase {
    pub fn new(orchestrator: ExecutionOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Applies the decision, emits the snapshot and restarts execution.
    pub fn execute(
        &self,
        agent: Agent,
        task_id: &TaskId,
        decision: ApprovalDecision,
        sink: Arc<dyn AgentUpdateSink>,
    ) -> Result<(Agent, RunHandle), DomainError> {
        let agent = resolve_approval(agent, task_id, decision)?;
        sink.on_update(agent.clone());
        let handle = self.orchestrator.start(agent.clone(), sink)?;
        Ok((agent, handle))
    }
}

/// Pure part of approval handling; nothing is emitted.
pub fn resolve_approval(
    mut agent: Agent,
    task_id: &TaskId,
    decision: ApprovalDecision,
) -> Result<Agent, DomainError> {
    let index = agent
        .task_index(task_id)
        .ok_or_else(|| DomainError::TaskNotFound(task_id.clone()))?;
    let task = &agent.tasks[index];
    if task.status != TaskStatus::AwaitingApproval {
        return Err(DomainError::TaskNotAwaitingApproval {
            task: task_id.clone(),
            status: task.status,
        });
    }
    agent.transition_to(AgentStatus::Running)?;

    let task = &mut agent.tasks[index];
    match decision {
        ApprovalDecision::Approve => {
            task.status = TaskStatus::Pending;
            task.approved = true;
        }
        ApprovalDecision::Deny => task.status = TaskStatus::Skipped,
    }
    let content = format!(
        "Action for task \"{}\" {} by user.",
        task.name,
        decision.as_str()
    );
    info!(agent = %agent.id, task = %task_id, decision = decision.as_str(), "Approval resolved");
    agent.record(HistoryRole::System, content);
    Ok(agent)
}
