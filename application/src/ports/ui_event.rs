//! UI event types emitted by the supervisor for presentation layer rendering
//!
//! These events form the output port from the application layer to the
//! presentation layer. The console receives them on a channel and renders
//! them between prompts.

use std::path::PathBuf;
use std::sync::Arc;
use steward_domain::{Agent, AgentId, AgentStatus, HistoryItem};

/// Events emitted by the supervisor for the presentation layer to render
#[derive(Debug, Clone)]
pub enum UiEvent {
    // === Agent lifecycle ===
    /// A new agent was planned and stored
    AgentCreated(Box<Agent>),
    /// A stored agent changed; carries only the entries that are new
    AgentUpdated(Box<AgentUpdatedEvent>),
    /// An agent was removed from the store
    AgentDeleted { id: AgentId, name: String },

    // === Planning ===
    /// The planner was asked for a corrective plan
    ReplanStarted { id: AgentId, name: String },

    // === Files ===
    /// An activity export was written
    Exported { id: AgentId, path: PathBuf },

    // === Errors ===
    /// A background operation failed outside any command
    BackgroundError { message: String },
}

/// Details of a stored snapshot
#[derive(Debug, Clone)]
pub struct AgentUpdatedEvent {
    pub agent: Agent,
    /// Status before the snapshot was merged
    pub previous_status: AgentStatus,
    /// History entries the previous state did not have
    pub new_entries: Vec<Arc<HistoryItem>>,
}

impl AgentUpdatedEvent {
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.agent.status
    }
}
