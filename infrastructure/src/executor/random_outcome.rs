//! Simulated tool calls that succeed with a fixed probability.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use steward_application::{ExecutorError, ExecutorPolicy};
use steward_domain::{Task, ToolOutcome};
use tracing::debug;

pub struct RandomOutcomeExecutor {
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl RandomOutcomeExecutor {
    /// `success_rate` is clamped to `[0, 1]`.
    pub fn new(success_rate: f64) -> Self {
        Self::with_rng(success_rate, StdRng::from_entropy())
    }

    /// Reproducible outcomes for a given seed.
    pub fn seeded(success_rate: f64, seed: u64) -> Self {
        Self::with_rng(success_rate, StdRng::seed_from_u64(seed))
    }

    fn with_rng(success_rate: f64, rng: StdRng) -> Self {
        let success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self {
            success_rate,
            rng: Mutex::new(rng),
        }
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    fn roll(&self) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_bool(self.success_rate)
    }
}

#[async_trait]
impl ExecutorPolicy for RandomOutcomeExecutor {
    async fn run(&self, task: &Task) -> Result<String, ExecutorError> {
        let succeeded = self.roll();
        debug!(task = %task.id, tool = %task.tool, succeeded, "Simulated tool call");
        if succeeded {
            Ok(ToolOutcome::simulated_success(&task.tool).message().to_string())
        } else {
            Err(ExecutorError(
                ToolOutcome::simulated_failure(&task.tool).message().to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_domain::TaskDescriptor;

    fn task() -> Task {
        Task::from_descriptor(TaskDescriptor::new("Notify", "desc", "SlackAPI"))
    }

    #[tokio::test]
    async fn test_certain_outcomes() {
        let always = RandomOutcomeExecutor::new(1.0);
        let never = RandomOutcomeExecutor::new(0.0);
        for _ in 0..20 {
            assert!(always.run(&task()).await.is_ok());
            assert_eq!(
                never.run(&task()).await.unwrap_err().0,
                "Tool SlackAPI failed. Error: Connection timed out."
            );
        }
    }

    #[tokio::test]
    async fn test_seeded_rate_is_roughly_honoured() {
        let executor = RandomOutcomeExecutor::seeded(0.85, 7);
        let mut successes = 0;
        for _ in 0..1000 {
            if executor.run(&task()).await.is_ok() {
                successes += 1;
            }
        }
        assert!((780..=920).contains(&successes), "got {successes}");
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(RandomOutcomeExecutor::new(3.0).success_rate(), 1.0);
        assert_eq!(RandomOutcomeExecutor::new(-1.0).success_rate(), 0.0);
        assert_eq!(RandomOutcomeExecutor::new(f64::NAN).success_rate(), 0.0);
    }
}
