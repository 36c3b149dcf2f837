//! Pure step machine for walking an agent's task list.
//!
//! The machine owns an agent snapshot and a cursor. Each [`ExecutionEvent`]
//! mutates the snapshot, and the returned [`Transition`] says what the driver
//! must do next: wait and feed another event, run the tool for a task, or
//! stop. Timers and tool calls live outside; this module never blocks.
//!
//! ```text
//! Ready --Advance--> Thinking --ThinkElapsed--> Executing --ToolFinished(ok)--> Ready
//!   |                   |                           |
//!   +-> Halted(Finished) +-> Halted(Approval)       +-> Halted(Replanning)
//! ```

use super::outcome::ToolOutcome;
use crate::agent::entities::{Agent, AgentStatus, Task, TaskStatus};
use crate::agent::value_objects::TaskId;
use crate::core::error::DomainError;
use crate::history::HistoryRole;

/// Input fed to the machine by its driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// Evaluate the task at the cursor
    Advance,
    /// The think-delay for the current task elapsed
    ThinkElapsed,
    /// The executor reported an outcome for the current task
    ToolFinished(ToolOutcome),
}

impl ExecutionEvent {
    fn as_str(&self) -> &'static str {
        match self {
            ExecutionEvent::Advance => "advance",
            ExecutionEvent::ThinkElapsed => "think_elapsed",
            ExecutionEvent::ToolFinished(_) => "tool_finished",
        }
    }
}

/// Named delays; their durations are configured by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Between starting a task and deciding approval/execution
    Think,
    /// Simulated duration of a tool call
    Execution,
    /// Pause after a completed task before the next one
    Settle,
}

/// Why the machine stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Every task is terminal; the agent is FINISHED
    Finished,
    /// A task hit its approval gate; the agent is PAUSED
    AwaitingApproval(TaskId),
    /// A task failed; the agent is REPLANNING
    Replanning(TaskId),
}

/// What the driver does after emitting the snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Next {
    /// Wait for `Delay`, then apply the event
    After(Delay, ExecutionEvent),
    /// Wait for `delay`, run the tool for `task`, then apply `ToolFinished`
    Execute { delay: Delay, task: Task },
    Halt(Halt),
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Independent copy of the agent to hand to observers
    pub snapshot: Agent,
    pub next: Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Ready,
    Thinking(usize),
    Executing(usize),
    Halted,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Stage::Ready => "ready",
            Stage::Thinking(_) => "thinking",
            Stage::Executing(_) => "executing",
            Stage::Halted => "halted",
        }
    }
}

/// Drives one agent's task list one event at a time
#[derive(Debug, Clone)]
pub struct ExecutionMachine {
    agent: Agent,
    cursor: usize,
    stage: Stage,
}

impl ExecutionMachine {
    /// Starts from a RUNNING agent with no task waiting on approval.
    pub fn new(agent: Agent) -> Result<Self, DomainError> {
        if agent.status != AgentStatus::Running {
            return Err(DomainError::NotRunning(agent.status));
        }
        if let Some(task) = agent.awaiting_approval() {
            return Err(DomainError::ApprovalPending(task.id.clone()));
        }
        let cursor = agent.resume_index();
        Ok(Self {
            agent,
            cursor,
            stage: Stage::Ready,
        })
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Index of the task being (or about to be) evaluated
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_halted(&self) -> bool {
        self.stage == Stage::Halted
    }

    pub fn apply(&mut self, event: ExecutionEvent) -> Result<Transition, DomainError> {
        match (self.stage, event) {
            (Stage::Ready, ExecutionEvent::Advance) => self.advance(),
            (Stage::Thinking(index), ExecutionEvent::ThinkElapsed) => Ok(self.after_think(index)),
            (Stage::Executing(index), ExecutionEvent::ToolFinished(outcome)) => {
                self.finish(index, outcome)
            }
            (stage, event) => Err(DomainError::UnexpectedEvent {
                stage: stage.as_str(),
                event: event.as_str(),
            }),
        }
    }

    fn advance(&mut self) -> Result<Transition, DomainError> {
        while self
            .agent
            .tasks
            .get(self.cursor)
            .is_some_and(|t| t.status.is_terminal())
        {
            self.cursor += 1;
        }

        if self.cursor >= self.agent.tasks.len() {
            self.agent.transition_to(AgentStatus::Finished)?;
            self.agent.record(HistoryRole::System, "All tasks completed.");
            return Ok(self.halt(Halt::Finished));
        }

        let index = self.cursor;
        let task = &mut self.agent.tasks[index];
        task.status = TaskStatus::InProgress;
        let content = format!("Task started: {}", task.name);
        self.agent.record_for_task(index, HistoryRole::System, content);
        self.stage = Stage::Thinking(index);
        Ok(self.emit(Next::After(Delay::Think, ExecutionEvent::ThinkElapsed)))
    }

    fn after_think(&mut self, index: usize) -> Transition {
        let task = &mut self.agent.tasks[index];
        if task.needs_approval() {
            task.status = TaskStatus::AwaitingApproval;
            let id = task.id.clone();
            self.agent.status = AgentStatus::Paused;
            self.agent.record_for_task(
                index,
                HistoryRole::System,
                "Human approval required to proceed.",
            );
            return self.halt(Halt::AwaitingApproval(id));
        }

        let content = format!("Executing tool {} with params...", task.tool);
        self.agent
            .record_for_task(index, HistoryRole::ToolInput, content);
        self.stage = Stage::Executing(index);
        let task = self.agent.tasks[index].clone();
        self.emit(Next::Execute {
            delay: Delay::Execution,
            task,
        })
    }

    fn finish(&mut self, index: usize, outcome: ToolOutcome) -> Result<Transition, DomainError> {
        let task = &mut self.agent.tasks[index];
        match outcome {
            ToolOutcome::Succeeded(result) => {
                task.status = TaskStatus::Completed;
                task.result = Some(result.clone());
                self.agent
                    .record_for_task(index, HistoryRole::ToolOutput, result);
                self.agent.record_for_task(
                    index,
                    HistoryRole::System,
                    "Task completed successfully.",
                );
                self.cursor += 1;
                self.stage = Stage::Ready;
                Ok(self.emit(Next::After(Delay::Settle, ExecutionEvent::Advance)))
            }
            ToolOutcome::Failed(error) => {
                task.status = TaskStatus::Failed;
                task.result = Some(error.clone());
                let id = task.id.clone();
                self.agent
                    .record_for_task(index, HistoryRole::System, error);
                self.agent.transition_to(AgentStatus::Replanning)?;
                Ok(self.halt(Halt::Replanning(id)))
            }
        }
    }

    fn halt(&mut self, halt: Halt) -> Transition {
        self.stage = Stage::Halted;
        self.emit(Next::Halt(halt))
    }

    fn emit(&self, next: Next) -> Transition {
        Transition {
            snapshot: self.agent.clone(),
            next,
        }
    }
}
