//! Execution orchestrator
//!
//! Drives an [`ExecutionMachine`] on a tokio task: waits the configured
//! delays, asks the executor policy for tool outcomes, and hands every
//! snapshot to an [`AgentUpdateSink`]. The returned [`RunHandle`] stops the
//! run; after `stop()` nothing more is emitted.
//!
//! ```text
//! start(agent) ──▶ apply(Advance) ──emit──▶ sleep(think) ──▶ apply(ThinkElapsed) ──emit──▶ ...
//!                                    │
//!                         token.cancelled() at every wait
//! ```

use crate::config::ExecutionTimings;
use crate::ports::executor_policy::{ExecutorPolicy, into_outcome};
use crate::ports::update_sink::AgentUpdateSink;
use std::sync::Arc;
use std::time::Duration;
use steward_domain::{
    Agent, AgentId, DomainError, ExecutionEvent, ExecutionMachine, Halt, Next,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Starts timer chains for RUNNING agents
#[derive(Clone)]
pub struct ExecutionOrchestrator {
    executor: Arc<dyn ExecutorPolicy>,
    timings: ExecutionTimings,
}

impl ExecutionOrchestrator {
    pub fn new(executor: Arc<dyn ExecutorPolicy>, timings: ExecutionTimings) -> Self {
        Self { executor, timings }
    }

    pub fn timings(&self) -> ExecutionTimings {
        self.timings
    }

    /// Begins driving `agent`'s tasks. Must be called inside a tokio runtime.
    ///
    /// Fails without spawning anything when the agent is not RUNNING or a
    /// task is still waiting for approval.
    pub fn start(
        &self,
        agent: Agent,
        sink: Arc<dyn AgentUpdateSink>,
    ) -> Result<RunHandle, DomainError> {
        let agent_id = agent.id.clone();
        let machine = ExecutionMachine::new(agent)?;
        let token = CancellationToken::new();

        info!(agent = %agent_id, cursor = machine.cursor(), "Starting execution");
        let task = tokio::spawn(drive(
            machine,
            Arc::clone(&self.executor),
            self.timings,
            sink,
            token.clone(),
        ));

        Ok(RunHandle {
            agent_id,
            token,
            task,
        })
    }
}

/// Handle to a live timer chain
#[derive(Debug)]
pub struct RunHandle {
    agent_id: AgentId,
    token: CancellationToken,
    task: JoinHandle<Option<Halt>>,
}

impl RunHandle {
    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Cancels pending timers and suppresses further emission. Idempotent.
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            debug!(agent = %self.agent_id, "Stopping execution");
            self.token.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the timer chain has exited (halted, stopped or panicked).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the chain to exit; `None` when it was stopped.
    pub async fn wait(self) -> Option<Halt> {
        self.task.await.ok().flatten()
    }
}

async fn drive(
    mut machine: ExecutionMachine,
    executor: Arc<dyn ExecutorPolicy>,
    timings: ExecutionTimings,
    sink: Arc<dyn AgentUpdateSink>,
    token: CancellationToken,
) -> Option<Halt> {
    let agent_id = machine.agent().id.clone();
    let mut event = ExecutionEvent::Advance;

    loop {
        if token.is_cancelled() {
            return None;
        }
        let transition = match machine.apply(event) {
            Ok(transition) => transition,
            Err(e) => {
                warn!(agent = %agent_id, "Execution aborted: {}", e);
                return None;
            }
        };
        if token.is_cancelled() {
            return None;
        }
        sink.on_update(transition.snapshot);

        event = match transition.next {
            Next::After(delay, next) => {
                if !wait(&token, timings.duration_of(delay)).await {
                    return None;
                }
                next
            }
            Next::Execute { delay, task } => {
                if !wait(&token, timings.duration_of(delay)).await {
                    return None;
                }
                debug!(agent = %agent_id, task = %task.id, tool = %task.tool, "Running tool");
                let result = tokio::select! {
                    _ = token.cancelled() => return None,
                    result = executor.run(&task) => result,
                };
                ExecutionEvent::ToolFinished(into_outcome(result))
            }
            Next::Halt(halt) => {
                info!(agent = %agent_id, ?halt, "Execution halted");
                return Some(halt);
            }
        };
    }
}

/// Sleeps for `duration`; `false` when cancelled first.
async fn wait(token: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
