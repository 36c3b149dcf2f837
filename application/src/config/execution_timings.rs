//! Execution timings - how long each orchestrator phase waits.
//!
//! [`ExecutionTimings`] maps the domain's named [`Delay`]s to concrete
//! durations. These are application-layer concerns, not domain policy:
//! the step machine only says *which* delay applies.

use serde::{Deserialize, Serialize};
use steward_domain::Delay;
use std::time::Duration;

/// Delays used by the execution orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTimings {
    /// Between "Task started" and the approval/execution decision.
    pub think: Duration,
    /// Simulated duration of a tool call.
    pub execution: Duration,
    /// Pause after a completed task before the next one starts.
    pub settle: Duration,
}

impl Default for ExecutionTimings {
    fn default() -> Self {
        Self {
            think: Duration::from_millis(1500),
            execution: Duration::from_millis(2000),
            settle: Duration::from_millis(1500),
        }
    }
}

impl ExecutionTimings {
    /// No waiting at all (tests, `--fast`).
    pub fn instant() -> Self {
        Self {
            think: Duration::ZERO,
            execution: Duration::ZERO,
            settle: Duration::ZERO,
        }
    }

    pub fn duration_of(&self, delay: Delay) -> Duration {
        match delay {
            Delay::Think => self.think,
            Delay::Execution => self.execution,
            Delay::Settle => self.settle,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_think(mut self, delay: Duration) -> Self {
        self.think = delay;
        self
    }

    pub fn with_execution(mut self, delay: Duration) -> Self {
        self.execution = delay;
        self
    }

    pub fn with_settle(mut self, delay: Duration) -> Self {
        self.settle = delay;
        self
    }
}
