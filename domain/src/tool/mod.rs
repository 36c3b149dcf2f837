//! Tool domain module
//!
//! Tools are named external capabilities a plan step invokes. The domain
//! only knows their catalog entry: a description, an enabled flag, and the
//! configuration fields a user may fill in. Invocation itself is simulated
//! by the application layer's executor policy.
//!
//! - [`Tool`] - catalog entry with its declared [`ConfigurationField`]s
//! - [`catalog::default_tools`] - the built-in catalog
//! - [`catalog::agent_templates`] - ready-made goals
//! - [`sample::sample_agents`] - seed agents for a fresh installation

pub mod catalog;
pub mod entities;
pub mod sample;

pub use catalog::{AgentTemplate, agent_templates, default_tools};
pub use entities::{ConfigurationField, FieldKind, Tool, ToolConfiguration};
pub use sample::sample_agents;
