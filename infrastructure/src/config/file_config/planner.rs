//! Planner configuration from TOML (`[planner]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw planner configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Simulated latency for new plans and follow-ups
    pub latency_ms: u64,
    /// Simulated latency for corrective plans
    pub replan_latency_ms: u64,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            replan_latency_ms: 2000,
        }
    }
}

impl FilePlannerConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn replan_latency(&self) -> Duration {
        Duration::from_millis(self.replan_latency_ms)
    }
}
