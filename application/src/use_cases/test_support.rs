//! Shared fixtures for use case tests.

use crate::ports::activity_logger::ActivityLogger;
use crate::ports::executor_policy::{ExecutorError, ExecutorPolicy};
use crate::ports::export_writer::{ExportError, ExportWriterPort};
use crate::ports::planner::{PlannerError, PlannerPort};
use crate::ports::update_sink::AgentUpdateSink;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use steward_domain::{
    Agent, AgentId, AgentStatus, HistoryItem, Task, TaskDescriptor, ToolOutcome,
};

/// Collects every emitted snapshot
#[derive(Default)]
pub(crate) struct Recorder(Mutex<Vec<Agent>>);

impl Recorder {
    pub(crate) fn snapshots(&self) -> Vec<Agent> {
        self.0.lock().unwrap().clone()
    }
}

impl AgentUpdateSink for Recorder {
    fn on_update(&self, agent: Agent) {
        self.0.lock().unwrap().push(agent);
    }
}

/// A RUNNING agent with four GenericAPI steps `t1..t4`.
pub(crate) fn running_agent(approval_at: Option<usize>) -> Agent {
    let tasks = (0..4)
        .map(|i| {
            let d = TaskDescriptor::new(format!("Step {}", i + 1), "desc", "GenericAPI");
            let d = if Some(i) == approval_at { d.with_approval() } else { d };
            Task::from_descriptor(d).with_id(format!("t{}", i + 1))
        })
        .collect();
    let mut agent = Agent::new("Runner", "Run every step of the plan", tasks);
    agent.status = AgentStatus::Running;
    agent
}

/// Planner returning fixed answers
pub(crate) struct ScriptedPlanner {
    pub(crate) plan: Result<Vec<TaskDescriptor>, PlannerError>,
    pub(crate) calls: Mutex<usize>,
    replan_delay: Duration,
}

impl ScriptedPlanner {
    pub(crate) fn returning(tasks: Vec<TaskDescriptor>) -> Self {
        Self {
            plan: Ok(tasks),
            calls: Mutex::new(0),
            replan_delay: Duration::ZERO,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            plan: Err(PlannerError::Failed(message.to_string())),
            calls: Mutex::new(0),
            replan_delay: Duration::ZERO,
        }
    }

    /// Makes `replan` take `delay` of wall-clock time before answering.
    pub(crate) fn with_replan_delay(mut self, delay: Duration) -> Self {
        self.replan_delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn answer(&self) -> Result<Vec<TaskDescriptor>, PlannerError> {
        *self.calls.lock().unwrap() += 1;
        self.plan.clone()
    }
}

#[async_trait]
impl PlannerPort for ScriptedPlanner {
    async fn create_plan(
        &self,
        _goal: &str,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError> {
        if enabled_tools.is_empty() {
            return Err(PlannerError::NoToolsForPlan);
        }
        self.answer()
    }

    async fn generate_follow_up(
        &self,
        _agent: &Agent,
        _message: &str,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError> {
        if enabled_tools.is_empty() {
            *self.calls.lock().unwrap() += 1;
            return Ok(Vec::new());
        }
        self.answer()
    }

    async fn replan(
        &self,
        _agent: &Agent,
        enabled_tools: &[String],
    ) -> Result<Vec<TaskDescriptor>, PlannerError> {
        if enabled_tools.is_empty() {
            return Err(PlannerError::NoToolsForReplan);
        }
        if !self.replan_delay.is_zero() {
            tokio::time::sleep(self.replan_delay).await;
        }
        self.answer()
    }
}

pub(crate) fn tools(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Keeps exports in memory
#[derive(Default)]
pub(crate) struct MemoryWriter(Mutex<Vec<(String, String)>>);

impl MemoryWriter {
    pub(crate) fn written(&self) -> Vec<(String, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl ExportWriterPort for MemoryWriter {
    fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, ExportError> {
        self.0
            .lock()
            .unwrap()
            .push((file_name.to_string(), contents.to_string()));
        Ok(PathBuf::from(file_name))
    }
}

/// Activity logger remembering `(agent, content)` pairs
#[derive(Default)]
pub(crate) struct RecordingLogger(Mutex<Vec<(AgentId, String)>>);

impl RecordingLogger {
    pub(crate) fn contents(&self) -> Vec<(AgentId, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl ActivityLogger for RecordingLogger {
    fn record(&self, agent_id: &AgentId, entry: &HistoryItem) {
        self.0
            .lock()
            .unwrap()
            .push((agent_id.clone(), entry.content.clone()));
    }
}

/// Fails the first `n` tool calls, then succeeds
pub(crate) struct FailFirst {
    remaining: AtomicUsize,
}

impl FailFirst {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(n),
        }
    }
}

#[async_trait]
impl ExecutorPolicy for FailFirst {
    async fn run(&self, task: &Task) -> Result<String, ExecutorError> {
        let failing = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            Err(ExecutorError(
                ToolOutcome::simulated_failure(&task.tool).message().to_string(),
            ))
        } else {
            Ok(ToolOutcome::simulated_success(&task.tool).message().to_string())
        }
    }
}
