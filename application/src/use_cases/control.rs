//! Status controls issued by the user: run, pause, reset.

use steward_domain::{Agent, AgentStatus, DomainError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// IDLE or PAUSED → RUNNING
    Run,
    /// RUNNING → PAUSED
    Pause,
    /// Any status → IDLE, re-queueing unfinished tasks
    Reset,
}

impl ControlAction {
    pub fn as_str(&self) -> &str {
        match self {
            ControlAction::Run => "run",
            ControlAction::Pause => "pause",
            ControlAction::Reset => "reset",
        }
    }
}

/// Applies a control to a snapshot. The caller must stop any live run first.
pub fn apply_control(mut agent: Agent, action: ControlAction) -> Result<Agent, DomainError> {
    match action {
        ControlAction::Run => {
            if let Some(task) = agent.awaiting_approval() {
                return Err(DomainError::ApprovalPending(task.id.clone()));
            }
            agent.transition_to(AgentStatus::Running)?;
        }
        ControlAction::Pause => agent.transition_to(AgentStatus::Paused)?,
        ControlAction::Reset => agent.reset(),
    }
    info!(agent = %agent.id, action = action.as_str(), status = %agent.status, "Control applied");
    Ok(agent)
}
