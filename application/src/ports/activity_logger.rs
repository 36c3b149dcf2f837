//! Port for structured activity logging.
//!
//! Defines the [`ActivityLogger`] trait for recording every new history
//! entry an agent produces to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! activity transcript in a machine-readable format (JSONL).

use steward_domain::{AgentId, HistoryItem};

/// Port for logging agent activity.
///
/// Implementations write each entry as a single record (e.g., one JSONL line).
/// The `record` method is synchronous and non-fallible so logging never
/// disrupts execution; failures are reported through `tracing` at most.
pub trait ActivityLogger: Send + Sync {
    fn record(&self, agent_id: &AgentId, entry: &HistoryItem);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoActivityLogger;

impl ActivityLogger for NoActivityLogger {
    fn record(&self, _agent_id: &AgentId, _entry: &HistoryItem) {}
}
