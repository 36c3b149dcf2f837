//! Replan Agent use case
//!
//! Recovers a REPLANNING agent: asks the planner for a corrective suffix,
//! splices it in place of the failed task, and resumes execution. A failed
//! recovery leaves the agent in ERROR.
//!
//! ```text
//! REPLANNING ──planner ok──▶ splice(failed..) ──▶ RUNNING ──▶ orchestrator.start
//!      │
//!      └──no failed task / planner error──▶ ERROR
//! ```

use super::orchestrate::{ExecutionOrchestrator, RunHandle};
use crate::ports::planner::PlannerPort;
use crate::ports::update_sink::AgentUpdateSink;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use steward_domain::{Agent, AgentId, AgentStatus, DomainError, HistoryRole};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ReplanError {
    #[error("Agent {id} is {status}, not REPLANNING")]
    NotReplanning { id: AgentId, status: AgentStatus },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result of a replan attempt
#[derive(Debug)]
pub enum ReplanOutcome {
    /// New plan spliced in; execution resumed from `agent`
    Resumed { agent: Agent, handle: RunHandle },
    /// Recovery failed; the agent is in ERROR
    Stopped(Agent),
    /// Another replan for the same agent is still running
    AlreadyInFlight,
}

/// Use case for recovering from a failed task
pub struct ReplanAgentUseCase {
    planner: Arc<dyn PlannerPort>,
    orchestrator: ExecutionOrchestrator,
    in_flight: Mutex<HashSet<AgentId>>,
}

/// Releases the single-flight slot when the attempt ends
struct InFlight<'a> {
    set: &'a Mutex<HashSet<AgentId>>,
    id: AgentId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.id);
    }
}

impl ReplanAgentUseCase {
    pub fn new(planner: Arc<dyn PlannerPort>, orchestrator: ExecutionOrchestrator) -> Self {
        Self {
            planner,
            orchestrator,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_in_flight(&self, id: &AgentId) -> bool {
        let set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.contains(id)
    }

    fn claim(&self, id: &AgentId) -> Option<InFlight<'_>> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(id.clone()) {
            return None;
        }
        Some(InFlight {
            set: &self.in_flight,
            id: id.clone(),
        })
    }

    pub async fn execute(
        &self,
        mut agent: Agent,
        enabled_tools: &[String],
        sink: Arc<dyn AgentUpdateSink>,
    ) -> Result<ReplanOutcome, ReplanError> {
        if agent.status != AgentStatus::Replanning {
            return Err(ReplanError::NotReplanning {
                id: agent.id.clone(),
                status: agent.status,
            });
        }
        let Some(_slot) = self.claim(&agent.id) else {
            info!(agent = %agent.id, "Replan already in flight, ignoring trigger");
            return Ok(ReplanOutcome::AlreadyInFlight);
        };

        let Some(failed_index) = agent.first_failed_index() else {
            warn!(agent = %agent.id, "REPLANNING agent has no failed task");
            stop_with_error(&mut agent, "Could not find failed task to replan from")?;
            sink.on_update(agent.clone());
            return Ok(ReplanOutcome::Stopped(agent));
        };

        info!(agent = %agent.id, failed = %agent.tasks[failed_index].id, "Replanning");
        match self.planner.replan(&agent, enabled_tools).await {
            Ok(descriptors) => {
                let added = descriptors.len();
                agent.splice_from(failed_index, descriptors);
                agent.transition_to(AgentStatus::Running)?;
                agent.record(
                    HistoryRole::Agent,
                    "I've created a new plan to overcome the error.",
                );
                sink.on_update(agent.clone());
                info!(agent = %agent.id, added, "Replan spliced, resuming");

                let handle = self.orchestrator.start(agent.clone(), sink)?;
                Ok(ReplanOutcome::Resumed { agent, handle })
            }
            Err(e) => {
                warn!(agent = %agent.id, "Replanning failed: {}", e);
                stop_with_error(&mut agent, &e.to_string())?;
                sink.on_update(agent.clone());
                Ok(ReplanOutcome::Stopped(agent))
            }
        }
    }
}

fn stop_with_error(agent: &mut Agent, message: &str) -> Result<(), DomainError> {
    agent.transition_to(AgentStatus::Error)?;
    agent.record(
        HistoryRole::Agent,
        format!(
            "I failed to create a new plan. Error: {}. I will stop execution.",
            message
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionTimings;
    use crate::ports::executor_policy::AlwaysSucceed;
    use crate::use_cases::test_support::{Recorder, ScriptedPlanner, running_agent, tools};
    use steward_domain::{Halt, TaskDescriptor, TaskStatus};

    fn failed_agent() -> Agent {
        let mut agent = running_agent(None);
        agent.tasks[0].status = TaskStatus::Completed;
        agent.tasks[1].status = TaskStatus::Failed;
        agent.tasks[1].result = Some("Tool GenericAPI failed. Error: Connection timed out.".into());
        agent.status = AgentStatus::Replanning;
        agent
    }

    fn use_case(planner: Arc<ScriptedPlanner>) -> ReplanAgentUseCase {
        let orchestrator =
            ExecutionOrchestrator::new(Arc::new(AlwaysSucceed), ExecutionTimings::instant());
        ReplanAgentUseCase::new(planner, orchestrator)
    }

    fn corrective_plan() -> Vec<TaskDescriptor> {
        vec![
            TaskDescriptor::new("Corrective Action", "fix", "GenericAPI"),
            TaskDescriptor::new("Resume Goal", "resume", "SlackAPI"),
        ]
    }

    #[tokio::test]
    async fn test_replan_splices_and_resumes() {
        let planner = Arc::new(ScriptedPlanner::returning(corrective_plan()));
        let recorder = Arc::new(Recorder::default());
        let outcome = use_case(planner.clone())
            .execute(failed_agent(), &tools(&["GenericAPI"]), recorder.clone())
            .await
            .unwrap();

        let ReplanOutcome::Resumed { agent, handle } = outcome else {
            panic!("expected resume");
        };
        let names: Vec<_> = agent.tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Step 1", "Corrective Action", "Resume Goal"]);
        assert_eq!(agent.status, AgentStatus::Running);
        assert_eq!(
            agent.history.last().unwrap().content,
            "I've created a new plan to overcome the error."
        );

        assert_eq!(handle.wait().await, Some(Halt::Finished));
        let last = recorder.snapshots().pop().unwrap();
        assert_eq!(last.status, AgentStatus::Finished);
        assert_eq!(planner.calls(), 1);
    }

    #[tokio::test]
    async fn test_planner_failure_moves_to_error() {
        let planner = Arc::new(ScriptedPlanner::failing("quota exceeded"));
        let recorder = Arc::new(Recorder::default());
        let before = failed_agent();
        let outcome = use_case(planner)
            .execute(before.clone(), &tools(&["GenericAPI"]), recorder.clone())
            .await
            .unwrap();

        let ReplanOutcome::Stopped(agent) = outcome else {
            panic!("expected stop");
        };
        assert_eq!(agent.status, AgentStatus::Error);
        assert_eq!(agent.tasks, before.tasks);
        let entry = agent.history.last().unwrap();
        assert_eq!(entry.role, HistoryRole::Agent);
        assert_eq!(
            entry.content,
            "I failed to create a new plan. Error: quota exceeded. I will stop execution."
        );
        assert_eq!(recorder.snapshots().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_failed_task_leaves_tasks_untouched() {
        let planner = Arc::new(ScriptedPlanner::returning(corrective_plan()));
        let mut agent = failed_agent();
        agent.tasks[1].status = TaskStatus::Completed;
        let before = agent.tasks.clone();

        let outcome = use_case(planner.clone())
            .execute(agent, &tools(&["GenericAPI"]), Arc::new(Recorder::default()))
            .await
            .unwrap();

        let ReplanOutcome::Stopped(agent) = outcome else {
            panic!("expected stop");
        };
        assert_eq!(agent.status, AgentStatus::Error);
        assert_eq!(agent.tasks, before);
        assert_eq!(planner.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejects_agent_not_replanning() {
        let planner = Arc::new(ScriptedPlanner::returning(corrective_plan()));
        let err = use_case(planner)
            .execute(running_agent(None), &tools(&["GenericAPI"]), Arc::new(Recorder::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReplanError::NotReplanning { .. }));
    }

    #[tokio::test]
    async fn test_single_flight_guard() {
        let planner = Arc::new(ScriptedPlanner::returning(corrective_plan()));
        let replan = use_case(planner.clone());
        let agent = failed_agent();

        let _slot = replan.claim(&agent.id).unwrap();
        assert!(replan.is_in_flight(&agent.id));
        let outcome = replan
            .execute(agent.clone(), &tools(&["GenericAPI"]), Arc::new(Recorder::default()))
            .await
            .unwrap();
        assert!(matches!(outcome, ReplanOutcome::AlreadyInFlight));
        assert_eq!(planner.calls(), 0);

        drop(_slot);
        assert!(!replan.is_in_flight(&agent.id));
    }
}
