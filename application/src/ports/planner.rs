//! Planner port
//!
//! Defines the interface for turning goals, failures and follow-up messages
//! into proposed plan steps. The default adapter (`MockPlanner`) lives in the
//! infrastructure layer.

use async_trait::async_trait;
use steward_domain::{Agent, TaskDescriptor};
use thiserror::Error;

/// Errors a planner can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("No tools are enabled. Please enable at least one tool from the Integrations page to create a plan.")]
    NoToolsForPlan,

    #[error("Cannot replan because no tools are enabled.")]
    NoToolsForReplan,

    #[error("{0}")]
    Failed(String),
}

/// Port for plan generation
///
/// Every method receives the names of the currently enabled tools.
#[async_trait]
pub trait PlannerPort: Send + Sync {
    /// Proposes the initial plan for a new goal. Fails on an empty tool set.
    async fn create_plan(
        &self,
        goal: &str,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError>;

    /// Proposes extra steps for a user message. Empty tool set yields no steps.
    async fn generate_follow_up(
        &self,
        agent: &Agent,
        message: &str,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError>;

    /// Proposes steps that replace the failed task and everything after it.
    async fn replan(
        &self,
        agent: &Agent,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError>;
}
