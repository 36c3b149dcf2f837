//! In-memory state backed by the persistence port.

pub mod agent_store;

pub use agent_store::AgentStore;
