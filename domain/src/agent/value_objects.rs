//! Agent domain value objects - identifiers shared across the agent model.
//!
//! # Identifiers
//! - [`AgentId`] - Unique identifier for an agent
//! - [`TaskId`] - Unique identifier for a task within an agent's plan
//! - [`HistoryItemId`] - Unique identifier for a history entry
//!
//! All identifiers serialize as plain strings so persisted JSON stays flat.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a fresh, globally unique identifier.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "-{}"), uuid::Uuid::new_v4().simple()))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for an agent.
    AgentId,
    "agent"
);

string_id!(
    /// Unique identifier for a task.
    ///
    /// Tasks keep their ID for their whole lifetime; a replan creates new
    /// task instances with fresh IDs rather than reviving old ones.
    TaskId,
    "task"
);

string_id!(
    /// Unique identifier for a history entry.
    HistoryItemId,
    "hist"
);
