//! Follow-up use case
//!
//! Turns a user message into extra plan steps. The agent's status is never
//! changed here and execution is not resumed; the caller decides that.

use crate::ports::planner::PlannerPort;
use crate::ports::update_sink::AgentUpdateSink;
use std::sync::Arc;
use steward_domain::{Agent, DomainError, HistoryRole};
use tracing::{info, warn};

pub struct FollowUpUseCase {
    planner: Arc<dyn PlannerPort>,
}

impl FollowUpUseCase {
    pub fn new(planner: Arc<dyn PlannerPort>) -> Self {
        Self { planner }
    }

    /// Records the message, asks the planner and appends its steps.
    ///
    /// Emits twice: once with the USER entry, once with the reply.
    pub async fn execute(
        &self,
        mut agent: Agent,
        message: &str,
        enabled_tools: &[String],
        sink: &dyn AgentUpdateSink,
    ) -> Result<Agent, DomainError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::EmptyMessage);
        }

        agent.record(HistoryRole::User, message);
        sink.on_update(agent.clone());

        let reply = match self
            .planner
            .generate_follow_up(&agent, message, enabled_tools)
            .await
        {
            Ok(descriptors) => {
                let added = agent.append_tasks(descriptors);
                info!(agent = %agent.id, added, "Follow-up planned");
                if added > 0 {
                    format!(
                        "Okay, I've added {} new task(s) to my plan based on your request.",
                        added
                    )
                } else if enabled_tools.is_empty() {
                    "I received your message, but I cannot perform any new actions because all tools are currently disabled.".to_string()
                } else {
                    "I've received your message. I will continue with my current plan as no new actions are needed.".to_string()
                }
            }
            Err(e) => {
                warn!(agent = %agent.id, "Follow-up planning failed: {}", e);
                format!("I'm sorry, I encountered an error trying to process that: {}", e)
            }
        };

        agent.record(HistoryRole::Agent, reply);
        sink.on_update(agent.clone());
        Ok(agent)
    }
}
