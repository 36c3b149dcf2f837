//! Application layer for steward
//!
//! This crate contains use cases, port definitions, the agent store and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod store;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionTimings;
pub use ports::{
    activity_logger::{ActivityLogger, NoActivityLogger},
    executor_policy::{AlwaysFail, AlwaysSucceed, ExecutorError, ExecutorPolicy},
    export_writer::{ExportError, ExportWriterPort},
    persistence::{InMemoryPersistence, PersistenceError, PersistencePort},
    planner::{PlannerError, PlannerPort},
    ui_event::{AgentUpdatedEvent, UiEvent},
    update_sink::AgentUpdateSink,
};
pub use store::AgentStore;
pub use use_cases::approve::ApprovalDecision;
pub use use_cases::control::ControlAction;
pub use use_cases::create_agent::{
    CreateAgentError, CreateAgentInput, MAX_GOAL_CHARS, MIN_GOAL_CHARS,
};
pub use use_cases::orchestrate::{ExecutionOrchestrator, RunHandle};
pub use use_cases::supervisor::{AgentSupervisor, SupervisorError};
