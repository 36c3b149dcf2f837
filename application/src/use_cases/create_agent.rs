//! Create Agent use case
//!
//! Validates a goal, asks the planner for an initial plan and builds a new
//! IDLE agent. Nothing is created when validation or planning fails.

use crate::ports::planner::{PlannerError, PlannerPort};
use std::sync::Arc;
use steward_domain::core::string::prefix_with_ellipsis;
use steward_domain::{Agent, DomainError, HistoryRole, Task};
use thiserror::Error;
use tracing::info;

/// Minimum goal length, in characters
pub const MIN_GOAL_CHARS: usize = 20;
/// Maximum goal length, in characters
pub const MAX_GOAL_CHARS: usize = 280;
/// Characters of the goal kept in the generated agent name
const NAME_CHARS: usize = 30;

#[derive(Error, Debug)]
pub enum CreateAgentError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("No tools are enabled; enable at least one tool before creating an agent")]
    NoToolsEnabled,

    #[error("Planning failed: {0}")]
    Planner(#[from] PlannerError),
}

/// Input for creating an agent
#[derive(Debug, Clone, Default)]
pub struct CreateAgentInput {
    pub goal: String,
    pub tags: Vec<String>,
}

impl CreateAgentInput {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

pub struct CreateAgentUseCase {
    planner: Arc<dyn PlannerPort>,
}

impl CreateAgentUseCase {
    pub fn new(planner: Arc<dyn PlannerPort>) -> Self {
        Self { planner }
    }

    pub async fn execute(
        &self,
        input: CreateAgentInput,
        enabled_tools: &[String],
    ) -> Result<Agent, CreateAgentError> {
        let goal = input.goal.trim();
        let length = goal.chars().count();
        if length < MIN_GOAL_CHARS {
            return Err(DomainError::GoalTooShort {
                min: MIN_GOAL_CHARS,
                actual: length,
            }
            .into());
        }
        if length > MAX_GOAL_CHARS {
            return Err(DomainError::GoalTooLong {
                max: MAX_GOAL_CHARS,
                actual: length,
            }
            .into());
        }
        if enabled_tools.is_empty() {
            return Err(CreateAgentError::NoToolsEnabled);
        }

        let descriptors = self.planner.create_plan(goal, enabled_tools).await?;
        let tasks = descriptors.into_iter().map(Task::from_descriptor).collect();

        let mut agent = Agent::new(prefix_with_ellipsis(goal, NAME_CHARS), goal, tasks);
        agent.set_tags(&input.tags)?;
        agent.record(
            HistoryRole::System,
            format!("Agent created with goal: \"{}\"", goal),
        );
        info!(agent = %agent.id, tasks = agent.tasks.len(), "Agent created");
        Ok(agent)
    }
}
