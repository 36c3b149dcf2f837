//! Execution configuration from TOML (`[execution]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use steward_application::ExecutionTimings;

/// Raw execution configuration from TOML
///
/// # Example
///
/// ```toml
/// [execution]
/// think_ms = 1500       # before a task's tool call (or approval gate)
/// execution_ms = 2000   # simulated tool latency
/// settle_ms = 1500      # pause before the next task starts
/// success_rate = 0.85   # probability a simulated tool call succeeds
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub think_ms: u64,
    pub execution_ms: u64,
    pub settle_ms: u64,
    pub success_rate: f64,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let timings = ExecutionTimings::default();
        Self {
            think_ms: timings.think.as_millis() as u64,
            execution_ms: timings.execution.as_millis() as u64,
            settle_ms: timings.settle.as_millis() as u64,
            success_rate: 0.85,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_timings(&self) -> ExecutionTimings {
        ExecutionTimings::default()
            .with_think(Duration::from_millis(self.think_ms))
            .with_execution(Duration::from_millis(self.execution_ms))
            .with_settle(Duration::from_millis(self.settle_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_timings() {
        let config = FileExecutionConfig::default();
        assert_eq!(config.to_timings(), ExecutionTimings::default());
    }

    #[test]
    fn test_to_timings() {
        let config = FileExecutionConfig {
            think_ms: 1,
            execution_ms: 2,
            settle_ms: 3,
            success_rate: 1.0,
        };
        let timings = config.to_timings();
        assert_eq!(timings.think, Duration::from_millis(1));
        assert_eq!(timings.execution, Duration::from_millis(2));
        assert_eq!(timings.settle, Duration::from_millis(3));
    }
}
