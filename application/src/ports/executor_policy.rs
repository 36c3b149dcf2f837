//! Executor policy port
//!
//! Decides the outcome of a simulated tool call. The orchestrator waits the
//! execution delay, asks the policy, and records whatever it reports.
//!
//! # Built-in Implementations
//!
//! - [`AlwaysSucceed`] - every call succeeds with the canned output
//! - [`AlwaysFail`] - every call fails with the canned timeout error
//!
//! The randomized production policy lives in the infrastructure layer.

use async_trait::async_trait;
use steward_domain::{Task, ToolOutcome};
use thiserror::Error;

/// A failed tool call; the message becomes the task result
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExecutorError(pub String);

/// Port for deciding tool call outcomes
#[async_trait]
pub trait ExecutorPolicy: Send + Sync {
    /// Runs (or pretends to run) the task's tool.
    async fn run(&self, task: &Task) -> Result<String, ExecutorError>;
}

/// Converts an executor result into the domain outcome.
pub fn into_outcome(result: Result<String, ExecutorError>) -> ToolOutcome {
    match result {
        Ok(output) => ToolOutcome::Succeeded(output),
        Err(error) => ToolOutcome::Failed(error.0),
    }
}

pub struct AlwaysSucceed;

#[async_trait]
impl ExecutorPolicy for AlwaysSucceed {
    async fn run(&self, task: &Task) -> Result<String, ExecutorError> {
        Ok(ToolOutcome::simulated_success(&task.tool).message().to_string())
    }
}

pub struct AlwaysFail;

#[async_trait]
impl ExecutorPolicy for AlwaysFail {
    async fn run(&self, task: &Task) -> Result<String, ExecutorError> {
        Err(ExecutorError(
            ToolOutcome::simulated_failure(&task.tool).message().to_string(),
        ))
    }
}
