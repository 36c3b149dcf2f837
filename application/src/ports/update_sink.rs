//! Update sink port
//!
//! Receives every agent snapshot produced by the orchestrator and the use
//! cases. Each snapshot is an independent value that replaces the previous
//! state for its agent id.

use steward_domain::Agent;

pub trait AgentUpdateSink: Send + Sync {
    fn on_update(&self, agent: Agent);
}

impl<F> AgentUpdateSink for F
where
    F: Fn(Agent) + Send + Sync,
{
    fn on_update(&self, agent: Agent) {
        self(agent)
    }
}
