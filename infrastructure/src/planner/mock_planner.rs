//! Canned planner
//!
//! Answers every request with a fixed plan after a simulated latency:
//!
//! | Request   | Steps                                                           |
//! |-----------|-----------------------------------------------------------------|
//! | create    | research (GoogleSearch), critical action (GenericAPI, approval), notify (SlackAPI) |
//! | follow-up | one GenericAPI step named after the message                     |
//! | replan    | corrective action (GenericAPI), resume goal (SlackAPI)          |

use async_trait::async_trait;
use std::time::Duration;
use steward_application::{PlannerError, PlannerPort};
use steward_domain::{Agent, TaskDescriptor};
use tracing::debug;

pub struct MockPlanner {
    latency: Duration,
    replan_latency: Duration,
}

impl MockPlanner {
    pub fn new(latency: Duration, replan_latency: Duration) -> Self {
        Self {
            latency,
            replan_latency,
        }
    }

    /// No simulated latency.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    async fn think(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockPlanner {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(2000))
    }
}

fn head(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

#[async_trait]
impl PlannerPort for MockPlanner {
    async fn create_plan(
        &self,
        goal: &str,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError> {
        if enabled_tools.is_empty() {
            return Err(PlannerError::NoToolsForPlan);
        }
        debug!(goal, "Creating canned plan");
        self.think(self.latency).await;

        Ok(vec![
            TaskDescriptor::new(
                format!("Step 1: Research for \"{}...\"", head(goal, 20)),
                "Gather information and context related to the goal.",
                "GoogleSearch",
            ),
            TaskDescriptor::new(
                "Step 2: Perform Critical Action",
                "Perform a critical action that requires user review before execution.",
                "GenericAPI",
            )
            .with_approval(),
            TaskDescriptor::new(
                "Step 3: Notify Stakeholders",
                "Summarize the results and post them to a communication channel.",
                "SlackAPI",
            ),
        ])
    }

    async fn generate_follow_up(
        &self,
        agent: &Agent,
        message: &str,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError> {
        debug!(agent = %agent.id, "Creating canned follow-up");
        self.think(self.latency).await;
        if enabled_tools.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![TaskDescriptor::new(
            format!("Follow-up: \"{}...\"", head(message, 30)),
            "Perform a new action based on the user's latest instruction.",
            "GenericAPI",
        )])
    }

    async fn replan(
        &self,
        agent: &Agent,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError> {
        debug!(agent = %agent.id, "Creating canned replan");
        self.think(self.replan_latency).await;
        if enabled_tools.is_empty() {
            return Err(PlannerError::NoToolsForReplan);
        }

        let failed = agent
            .first_failed_index()
            .map(|i| agent.tasks[i].name.as_str())
            .unwrap_or("unknown task");
        Ok(vec![
            TaskDescriptor::new(
                format!("Corrective Action for '{}'", failed),
                "A new step to fix the previous error by trying an alternative method.",
                "GenericAPI",
            ),
            TaskDescriptor::new(
                "Resume Goal",
                "Continue with the original plan from a safe state.",
                "SlackAPI",
            ),
        ])
    }
}
