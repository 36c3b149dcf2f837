//! Persistence port
//!
//! A small key-value contract: each key holds one JSON document. The agent
//! store decides what lives under which key; adapters only move bytes.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Key holding the serialized agent list
pub const AGENTS_KEY: &str = "agents";
/// Key holding the tool enablement map
pub const TOOLS_KEY: &str = "tools";
/// Key holding per-tool configuration maps
pub const TOOL_CONFIGS_KEY: &str = "tool-configs";

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt document for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Port for key-value JSON persistence
///
/// Synchronous: writes happen on the supervisor's thread between awaits, so
/// adapters should keep documents compact.
pub trait PersistencePort: Send + Sync {
    /// Returns `None` when nothing was ever saved under `key`.
    fn load(&self, key: &str) -> Result<Option<Value>, PersistenceError>;

    fn save(&self, key: &str, value: &Value) -> Result<(), PersistenceError>;
}

/// Process-local persistence for tests.
#[derive(Default)]
pub struct InMemoryPersistence {
    documents: Mutex<HashMap<String, Value>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistencePort for InMemoryPersistence {
    fn load(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(documents.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        let mut documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        documents.insert(key.to_string(), value.clone());
        Ok(())
    }
}
