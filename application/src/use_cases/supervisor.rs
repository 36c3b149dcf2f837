//! Agent Supervisor
//!
//! Owns the [`AgentStore`] and at most one live [`RunHandle`] per agent.
//! Every snapshot produced by a run, a replan or a use case travels through
//! one internal channel and is merged into the store in arrival order; the
//! supervisor then emits [`UiEvent`]s for the presentation layer.
//!
//! Each run is tagged with a [`RunId`]. A user action that changes an agent
//! (run, pause, reset, approval, follow-up, deletion) retires the current id
//! before anything new starts, so snapshots still in flight from the old
//! chain are dropped instead of overwriting the newer state.
//!
//! At most one replan per agent is outstanding. When its result comes back
//! for a retired run, the stored agent is checked again: if it is still
//! REPLANNING, a fresh replan starts from the stored state.
//!
//! ```text
//!  orchestrator ─┐
//!  replan task  ─┼─ Update::Snapshot{run} ──▶ next_update() ──▶ store.upsert ──▶ UiEvent
//!  use cases    ─┘                                  │
//!                                                   └─ REPLANNING ──▶ spawn replan
//! ```

use super::approve::{ApprovalDecision, ApproveTaskUseCase};
use super::control::{ControlAction, apply_control};
use super::create_agent::{CreateAgentError, CreateAgentInput, CreateAgentUseCase};
use super::export::ExportAgentUseCase;
use super::follow_up::FollowUpUseCase;
use super::orchestrate::{ExecutionOrchestrator, RunHandle};
use super::replan::{ReplanAgentUseCase, ReplanError, ReplanOutcome};
use crate::ports::activity_logger::{ActivityLogger, NoActivityLogger};
use crate::ports::export_writer::{ExportError, ExportWriterPort};
use crate::ports::planner::PlannerPort;
use crate::ports::ui_event::{AgentUpdatedEvent, UiEvent};
use crate::ports::update_sink::AgentUpdateSink;
use crate::store::AgentStore;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use steward_domain::{
    Agent, AgentId, AgentStatus, DomainError, HistoryItem, HistoryItemId, TaskId,
    ToolConfiguration,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Create(#[from] CreateAgentError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Generation counter for an agent's execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunId(u64);

struct LiveRun {
    id: RunId,
    handle: Option<RunHandle>,
}

enum Update {
    Snapshot {
        run: RunId,
        agent: Agent,
    },
    Replanned {
        run: RunId,
        id: AgentId,
        outcome: Result<ReplanOutcome, ReplanError>,
    },
}

/// Sink that tags snapshots with the run they belong to
struct RunSink {
    run: RunId,
    tx: mpsc::UnboundedSender<Update>,
}

impl AgentUpdateSink for RunSink {
    fn on_update(&self, agent: Agent) {
        // The receiver lives as long as the supervisor.
        let _ = self.tx.send(Update::Snapshot {
            run: self.run,
            agent,
        });
    }
}

pub struct AgentSupervisor {
    store: AgentStore,
    orchestrator: ExecutionOrchestrator,
    replan: Arc<ReplanAgentUseCase>,
    approve: ApproveTaskUseCase,
    follow_up: FollowUpUseCase,
    create: CreateAgentUseCase,
    export: ExportAgentUseCase,
    activity_logger: Arc<dyn ActivityLogger>,
    runs: HashMap<AgentId, LiveRun>,
    /// Agents with a spawned replan whose result has not been applied yet
    pending_replans: HashSet<AgentId>,
    next_run: u64,
    updates_tx: mpsc::UnboundedSender<Update>,
    updates_rx: mpsc::UnboundedReceiver<Update>,
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl AgentSupervisor {
    pub fn new(
        store: AgentStore,
        planner: Arc<dyn PlannerPort>,
        orchestrator: ExecutionOrchestrator,
        export_writer: Arc<dyn ExportWriterPort>,
        tx: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            store,
            replan: Arc::new(ReplanAgentUseCase::new(
                Arc::clone(&planner),
                orchestrator.clone(),
            )),
            approve: ApproveTaskUseCase::new(orchestrator.clone()),
            follow_up: FollowUpUseCase::new(Arc::clone(&planner)),
            create: CreateAgentUseCase::new(planner),
            export: ExportAgentUseCase::new(export_writer),
            orchestrator,
            activity_logger: Arc::new(NoActivityLogger),
            runs: HashMap::new(),
            pending_replans: HashSet::new(),
            next_run: 0,
            updates_tx,
            updates_rx,
            tx,
        }
    }

    pub fn with_activity_logger(mut self, logger: Arc<dyn ActivityLogger>) -> Self {
        self.activity_logger = logger;
        self
    }

    pub fn store(&self) -> &AgentStore {
        &self.store
    }

    /// Whether a timer chain is currently driving the agent.
    pub fn is_live(&self, id: &AgentId) -> bool {
        self.runs
            .get(id)
            .and_then(|run| run.handle.as_ref())
            .is_some_and(|handle| !handle.is_finished() && !handle.is_stopped())
    }

    /// Picks up work persisted mid-flight: RUNNING agents resume,
    /// REPLANNING agents get a replan.
    pub fn resume(&mut self) {
        let pending: Vec<Agent> = self
            .store
            .agents()
            .iter()
            .filter(|a| matches!(a.status, AgentStatus::Running | AgentStatus::Replanning))
            .cloned()
            .collect();

        for agent in pending {
            info!(agent = %agent.id, status = %agent.status, "Resuming persisted agent");
            if agent.status == AgentStatus::Replanning {
                self.trigger_replan(agent);
                continue;
            }
            let run = self.retire_run(&agent.id);
            if let Err(e) = self.launch(run, agent.clone()) {
                warn!(agent = %agent.id, "Cannot resume: {}", e);
            }
        }
    }

    // ==================== Update loop ====================

    /// Waits for the next snapshot or replan result and applies it.
    ///
    /// Cancel-safe: nothing is awaited after the update is received.
    pub async fn next_update(&mut self) {
        if let Some(update) = self.updates_rx.recv().await {
            self.apply(update);
        }
    }

    /// Applies every update already queued; returns how many there were.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            self.apply(update);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Snapshot { run, mut agent } => {
                if !self.is_current(&agent.id, run) {
                    debug!(agent = %agent.id, ?run, "Dropping stale snapshot");
                    return;
                }
                // Tags are edited outside runs; snapshots carry the copy
                // taken when the run started.
                if let Some(stored) = self.store.get(&agent.id) {
                    agent.tags = stored.tags.clone();
                }
                self.commit(agent);
            }
            Update::Replanned { run, id, outcome } => {
                self.pending_replans.remove(&id);
                match outcome {
                    Ok(ReplanOutcome::Resumed { handle, .. }) => {
                        match self.runs.get_mut(&id).filter(|live| live.id == run) {
                            Some(live) => {
                                live.handle = Some(handle);
                                return;
                            }
                            None => {
                                debug!(agent = %id, "Replan finished after a newer action");
                                handle.stop();
                            }
                        }
                    }
                    Ok(ReplanOutcome::Stopped(_)) | Ok(ReplanOutcome::AlreadyInFlight) => {}
                    Err(e) => {
                        warn!(agent = %id, "Replan rejected: {}", e);
                        self.emit(UiEvent::BackgroundError {
                            message: e.to_string(),
                        });
                        return;
                    }
                }
                self.replan_if_stranded(&id);
            }
        }
    }

    /// Starts a replan for an agent left in REPLANNING once its previous
    /// replan result was discarded.
    fn replan_if_stranded(&mut self, id: &AgentId) {
        let Some(agent) = self
            .store
            .get(id)
            .filter(|agent| agent.status == AgentStatus::Replanning)
        else {
            return;
        };
        info!(agent = %id, "Agent still REPLANNING after a discarded replan, retrying");
        let agent = agent.clone();
        self.trigger_replan(agent);
    }

    /// Stores a snapshot, logs its new entries and notifies the console.
    fn commit(&mut self, agent: Agent) {
        let (previous_status, new_entries) = match self.store.get(&agent.id) {
            Some(previous) => (previous.status, new_entries(previous, &agent)),
            None => (agent.status, agent.history.clone()),
        };
        for entry in &new_entries {
            self.activity_logger.record(&agent.id, entry);
        }

        let replanning = agent.status == AgentStatus::Replanning
            && previous_status != AgentStatus::Replanning;
        self.store.upsert(agent.clone());
        self.emit(UiEvent::AgentUpdated(Box::new(AgentUpdatedEvent {
            agent: agent.clone(),
            previous_status,
            new_entries,
        })));

        if replanning {
            self.trigger_replan(agent);
        }
    }

    fn trigger_replan(&mut self, agent: Agent) {
        if self.pending_replans.contains(&agent.id) || self.replan.is_in_flight(&agent.id) {
            debug!(agent = %agent.id, "Replan already running");
            return;
        }
        self.pending_replans.insert(agent.id.clone());
        let run = match self.runs.get(&agent.id) {
            Some(live) => live.id,
            None => self.retire_run(&agent.id),
        };

        self.emit(UiEvent::ReplanStarted {
            id: agent.id.clone(),
            name: agent.name.clone(),
        });
        let replan = Arc::clone(&self.replan);
        let sink: Arc<dyn AgentUpdateSink> = Arc::new(self.sink(run));
        let updates = self.updates_tx.clone();
        let tools = self.store.enabled_tool_names();
        tokio::spawn(async move {
            let id = agent.id.clone();
            let outcome = replan.execute(agent, &tools, sink).await;
            let _ = updates.send(Update::Replanned { run, id, outcome });
        });
    }

    // ==================== Commands ====================

    pub async fn create_agent(&mut self, input: CreateAgentInput) -> Result<Agent, SupervisorError> {
        let tools = self.store.enabled_tool_names();
        let agent = self.create.execute(input, &tools).await?;
        for entry in &agent.history {
            self.activity_logger.record(&agent.id, entry);
        }
        self.store.insert(agent.clone());
        self.emit(UiEvent::AgentCreated(Box::new(agent.clone())));
        Ok(agent)
    }

    /// Run, pause or reset an agent.
    pub fn control(&mut self, id: &AgentId, action: ControlAction) -> Result<Agent, SupervisorError> {
        self.pump();
        let agent = self.require(id)?.clone();
        if action == ControlAction::Run && agent.status == AgentStatus::Running && self.is_live(id)
        {
            return Ok(agent);
        }

        let agent = apply_control(agent, action)?;
        let run = self.retire_run(id);
        self.commit(agent.clone());
        if agent.status == AgentStatus::Running {
            self.launch(run, agent.clone())?;
        }
        Ok(agent)
    }

    /// Resolves the approval gate on `task_id` and resumes execution.
    pub fn resolve_approval(
        &mut self,
        id: &AgentId,
        task_id: &TaskId,
        decision: ApprovalDecision,
    ) -> Result<Agent, SupervisorError> {
        self.pump();
        let agent = self.require(id)?.clone();
        let run = self.reserve_run();
        let sink: Arc<dyn AgentUpdateSink> = Arc::new(self.sink(run));
        let (agent, handle) = self.approve.execute(agent, task_id, decision, sink)?;
        self.install_run(id, run, Some(handle));
        self.pump();
        Ok(self.store.get(id).cloned().unwrap_or(agent))
    }

    /// Posts a user message; new tasks are appended to the plan.
    ///
    /// A RUNNING agent is halted while the planner answers and resumed after.
    pub async fn send_message(
        &mut self,
        id: &AgentId,
        message: &str,
    ) -> Result<Agent, SupervisorError> {
        if message.trim().is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }
        self.pump();
        let agent = self.require(id)?.clone();
        let was_running = agent.status == AgentStatus::Running;
        let run = self.retire_run(id);

        let tools = self.store.enabled_tool_names();
        let sink = self.sink(run);
        let agent = self
            .follow_up
            .execute(agent, message, &tools, &sink)
            .await?;
        self.pump();

        if was_running && agent.status == AgentStatus::Running {
            self.launch(run, agent.clone())?;
        }
        Ok(agent)
    }

    pub fn update_tags(&mut self, id: &AgentId, tags: &[String]) -> Result<Agent, SupervisorError> {
        self.pump();
        let agent = self.store.update_tags(id, tags)?.clone();
        info!(agent = %id, tags = ?agent.tags, "Tags updated");
        Ok(agent)
    }

    pub fn delete(&mut self, id: &AgentId) -> Result<Agent, SupervisorError> {
        self.pump();
        if let Some(handle) = self.runs.remove(id).and_then(|live| live.handle) {
            handle.stop();
        }
        let agent = self
            .store
            .delete(id)
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))?;
        info!(agent = %id, "Agent deleted");
        self.emit(UiEvent::AgentDeleted {
            id: agent.id.clone(),
            name: agent.name.clone(),
        });
        Ok(agent)
    }

    pub fn export(&mut self, id: &AgentId) -> Result<PathBuf, SupervisorError> {
        self.pump();
        let agent = self.require(id)?;
        let path = self.export.execute(agent)?;
        self.emit(UiEvent::Exported {
            id: id.clone(),
            path: path.clone(),
        });
        Ok(path)
    }

    pub fn toggle_tool(&mut self, name: &str) -> Result<bool, SupervisorError> {
        let enabled = self.store.toggle_tool(name)?;
        info!(tool = name, enabled, "Tool toggled");
        Ok(enabled)
    }

    pub fn configure_tool(
        &mut self,
        name: &str,
        values: ToolConfiguration,
    ) -> Result<ToolConfiguration, SupervisorError> {
        let saved = self.store.save_tool_configuration(name, values)?;
        info!(tool = name, fields = saved.len(), "Tool configured");
        Ok(saved)
    }

    /// Stops every live run.
    pub fn shutdown(&mut self) {
        for (_, live) in self.runs.drain() {
            if let Some(handle) = live.handle {
                handle.stop();
            }
        }
    }

    // ==================== Runs ====================

    fn require(&self, id: &AgentId) -> Result<&Agent, DomainError> {
        self.store
            .get(id)
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))
    }

    fn is_current(&self, id: &AgentId, run: RunId) -> bool {
        self.runs.get(id).is_some_and(|live| live.id == run)
    }

    fn reserve_run(&mut self) -> RunId {
        self.next_run += 1;
        RunId(self.next_run)
    }

    /// Makes `run` the agent's current run, stopping the previous chain.
    fn install_run(&mut self, id: &AgentId, run: RunId, handle: Option<RunHandle>) {
        let previous = self.runs.insert(id.clone(), LiveRun { id: run, handle });
        if let Some(handle) = previous.and_then(|live| live.handle) {
            handle.stop();
        }
    }

    /// Stops the current chain and returns a fresh, idle run id.
    fn retire_run(&mut self, id: &AgentId) -> RunId {
        let run = self.reserve_run();
        self.install_run(id, run, None);
        run
    }

    fn launch(&mut self, run: RunId, agent: Agent) -> Result<(), DomainError> {
        let id = agent.id.clone();
        let handle = self.orchestrator.start(agent, Arc::new(self.sink(run)))?;
        match self.runs.get_mut(&id).filter(|live| live.id == run) {
            Some(live) => live.handle = Some(handle),
            None => handle.stop(),
        }
        Ok(())
    }

    fn sink(&self, run: RunId) -> RunSink {
        RunSink {
            run,
            tx: self.updates_tx.clone(),
        }
    }

    fn emit(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            debug!("UI event receiver dropped");
        }
    }
}

impl Drop for AgentSupervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// History entries in `next` that `previous` does not have.
fn new_entries(previous: &Agent, next: &Agent) -> Vec<Arc<HistoryItem>> {
    let known: HashSet<&HistoryItemId> = previous.history.iter().map(|h| &h.id).collect();
    next.history
        .iter()
        .filter(|h| !known.contains(&h.id))
        .cloned()
        .collect()
}
