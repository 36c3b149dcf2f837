//! Agent store
//!
//! Holds agents, tool enablement and tool configuration in memory and writes
//! every mutation through to a [`PersistencePort`]. Three documents are used:
//!
//! | Key            | Shape                                   |
//! |----------------|-----------------------------------------|
//! | `agents`       | array of agents, newest first           |
//! | `tools`        | `{ "<tool>": <enabled> }`               |
//! | `tool-configs` | `{ "<tool>": { "<field>": "<value>" } }` |
//!
//! Missing or unreadable documents fall back to defaults (seed agents, the
//! built-in catalog, no configuration). Write failures are logged and never
//! undo the in-memory change.

use crate::ports::persistence::{AGENTS_KEY, PersistencePort, TOOL_CONFIGS_KEY, TOOLS_KEY};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use steward_domain::{
    Agent, AgentId, DomainError, Tool, ToolConfiguration, default_tools, sample_agents,
};
use tracing::{debug, warn};

pub struct AgentStore {
    persistence: Arc<dyn PersistencePort>,
    agents: Vec<Agent>,
    tools: Vec<Tool>,
    tool_configs: BTreeMap<String, ToolConfiguration>,
}

impl AgentStore {
    /// Loads every document, falling back to defaults per document.
    pub fn load(persistence: Arc<dyn PersistencePort>) -> Self {
        let agents = load_or(&*persistence, AGENTS_KEY, sample_agents);
        Self::with_agents(persistence, agents)
    }

    /// Starts from the seed agents, ignoring persisted ones.
    pub fn load_fresh(persistence: Arc<dyn PersistencePort>) -> Self {
        Self::with_agents(persistence, sample_agents())
    }

    fn with_agents(persistence: Arc<dyn PersistencePort>, agents: Vec<Agent>) -> Self {
        let enabled: BTreeMap<String, bool> = load_or(&*persistence, TOOLS_KEY, BTreeMap::new);
        let tools = default_tools()
            .into_iter()
            .map(|mut tool| {
                if let Some(flag) = enabled.get(&tool.name) {
                    tool.enabled = *flag;
                }
                tool
            })
            .collect();
        let tool_configs = load_or(&*persistence, TOOL_CONFIGS_KEY, BTreeMap::new);

        Self {
            persistence,
            agents,
            tools,
            tool_configs,
        }
    }

    // ==================== Agents ====================

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| &a.id == id)
    }

    /// Resolves a user reference: exact id, 1-based list position, unique id
    /// prefix, then case-insensitive name.
    pub fn find(&self, reference: &str) -> Option<&Agent> {
        let reference = reference.trim();
        if let Some(agent) = self.agents.iter().find(|a| a.id.as_str() == reference) {
            return Some(agent);
        }
        if let Ok(position) = reference.parse::<usize>() {
            return position.checked_sub(1).and_then(|i| self.agents.get(i));
        }
        let mut prefixed = self
            .agents
            .iter()
            .filter(|a| a.id.as_str().starts_with(reference));
        if let (Some(agent), None) = (prefixed.next(), prefixed.next()) {
            return Some(agent);
        }
        self.agents
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(reference))
    }

    /// Adds a new agent at the front of the list.
    pub fn insert(&mut self, agent: Agent) {
        self.agents.insert(0, agent);
        self.persist_agents();
    }

    /// Replaces the agent with the same id, or inserts it. Returns the replaced value.
    pub fn upsert(&mut self, agent: Agent) -> Option<Agent> {
        let previous = match self.agents.iter_mut().find(|a| a.id == agent.id) {
            Some(slot) => Some(std::mem::replace(slot, agent)),
            None => {
                self.agents.insert(0, agent);
                None
            }
        };
        self.persist_agents();
        previous
    }

    pub fn delete(&mut self, id: &AgentId) -> Option<Agent> {
        let index = self.agents.iter().position(|a| &a.id == id)?;
        let removed = self.agents.remove(index);
        self.persist_agents();
        Some(removed)
    }

    /// Replaces an agent's tags.
    pub fn update_tags<I, S>(&mut self, id: &AgentId, tags: I) -> Result<&Agent, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = self
            .agents
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| DomainError::AgentNotFound(id.to_string()))?;
        self.agents[index].set_tags(tags)?;
        self.persist_agents();
        Ok(&self.agents[index])
    }

    // ==================== Tools ====================

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn enabled_tool_names(&self) -> Vec<String> {
        self.tools
            .iter()
            .filter(|t| t.enabled)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Flips a tool's enabled flag; returns the new value.
    pub fn toggle_tool(&mut self, name: &str) -> Result<bool, DomainError> {
        let tool = self
            .tools
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| DomainError::ToolNotFound(name.to_string()))?;
        tool.enabled = !tool.enabled;
        let enabled = tool.enabled;

        let flags: BTreeMap<&str, bool> = self
            .tools
            .iter()
            .map(|t| (t.name.as_str(), t.enabled))
            .collect();
        self.persist(TOOLS_KEY, &flags);
        Ok(enabled)
    }

    pub fn tool_configuration(&self, name: &str) -> ToolConfiguration {
        self.tool_configs.get(name).cloned().unwrap_or_default()
    }

    /// Merges values into a tool's configuration; only declared fields are accepted.
    pub fn save_tool_configuration(
        &mut self,
        name: &str,
        values: ToolConfiguration,
    ) -> Result<ToolConfiguration, DomainError> {
        let tool = self
            .tool(name)
            .ok_or_else(|| DomainError::ToolNotFound(name.to_string()))?;
        let values = tool.validate_configuration(values)?;

        let config = self.tool_configs.entry(name.to_string()).or_default();
        config.extend(values);
        let saved = config.clone();
        self.persist(TOOL_CONFIGS_KEY, &self.tool_configs);
        Ok(saved)
    }

    // ==================== Persistence ====================

    fn persist_agents(&self) {
        self.persist(AGENTS_KEY, &self.agents);
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let document = match serde_json::to_value(value) {
            Ok(document) => document,
            Err(e) => {
                warn!(key, "Failed to serialize document: {}", e);
                return;
            }
        };
        match self.persistence.save(key, &document) {
            Ok(()) => debug!(key, "Document saved"),
            Err(e) => warn!(key, "Failed to persist document: {}", e),
        }
    }
}

fn load_or<T: DeserializeOwned>(
    persistence: &dyn PersistencePort,
    key: &str,
    default: impl FnOnce() -> T,
) -> T {
    match persistence.load(key) {
        Ok(Some(document)) => match serde_json::from_value(document) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, "Ignoring unreadable document: {}", e);
                default()
            }
        },
        Ok(None) => default(),
        Err(e) => {
            warn!(key, "Failed to load document: {}", e);
            default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::persistence::{InMemoryPersistence, PersistenceError};
    use serde_json::{Value, json};
    use steward_domain::AgentStatus;

    fn store() -> (Arc<InMemoryPersistence>, AgentStore) {
        let persistence = Arc::new(InMemoryPersistence::new());
        let store = AgentStore::load(persistence.clone());
        (persistence, store)
    }

    #[test]
    fn test_defaults_when_nothing_persisted() {
        let (_, store) = store();
        assert_eq!(store.agents().len(), 2);
        assert_eq!(store.tools().len(), 11);
        assert_eq!(store.enabled_tool_names().len(), 11);
        assert!(store.tool_configuration("SlackAPI").is_empty());
    }

    #[test]
    fn test_insert_upsert_delete_write_through() {
        let (persistence, mut store) = store();
        let agent = Agent::new("New", "A brand new goal for testing", Vec::new());
        let id = agent.id.clone();

        store.insert(agent.clone());
        assert_eq!(store.agents()[0].id, id);

        let mut changed = agent.clone();
        changed.status = AgentStatus::Running;
        let previous = store.upsert(changed).unwrap();
        assert_eq!(previous.status, AgentStatus::Idle);
        assert_eq!(store.get(&id).unwrap().status, AgentStatus::Running);

        let reloaded = AgentStore::load(persistence.clone());
        assert_eq!(reloaded.get(&id).unwrap().status, AgentStatus::Running);

        assert!(store.delete(&id).is_some());
        assert!(store.delete(&id).is_none());
        let reloaded = AgentStore::load(persistence);
        assert!(reloaded.get(&id).is_none());
        assert_eq!(reloaded.agents().len(), 2);
    }

    #[test]
    fn test_find_by_reference() {
        let (_, store) = store();
        assert_eq!(store.find("agent-1").unwrap().name, "K8s Pod Monitor");
        assert_eq!(store.find("2").unwrap().id.as_str(), "agent-2");
        assert_eq!(store.find("agent-2").unwrap().id.as_str(), "agent-2");
        assert_eq!(store.find("k8s pod monitor").unwrap().id.as_str(), "agent-1");
        // "agent-" prefixes both seeds
        assert!(store.find("agent-").is_none());
        assert!(store.find("0").is_none());
        assert!(store.find("9").is_none());
    }

    #[test]
    fn test_update_tags() {
        let (persistence, mut store) = store();
        let id = AgentId::new("agent-1");
        let agent = store.update_tags(&id, ["ops", "k8s", "ops"]).unwrap();
        assert_eq!(agent.tags, vec!["ops", "k8s"]);
        assert!(store.update_tags(&id, ["two words"]).is_err());
        assert!(matches!(
            store.update_tags(&AgentId::new("missing"), ["x"]),
            Err(DomainError::AgentNotFound(_))
        ));
        let reloaded = AgentStore::load(persistence);
        assert_eq!(reloaded.get(&id).unwrap().tags, vec!["ops", "k8s"]);
    }

    #[test]
    fn test_toggle_tool_persists_flags() {
        let (persistence, mut store) = store();
        assert!(!store.toggle_tool("SlackAPI").unwrap());
        assert!(!store.enabled_tool_names().contains(&"SlackAPI".to_string()));
        assert!(store.toggle_tool("Nope").is_err());

        let reloaded = AgentStore::load(persistence.clone());
        assert!(!reloaded.tool("SlackAPI").unwrap().enabled);
        assert!(reloaded.tool("GitHubAPI").unwrap().enabled);
        assert_eq!(
            persistence.load(TOOLS_KEY).unwrap().unwrap()["SlackAPI"],
            json!(false)
        );
    }

    #[test]
    fn test_tool_configuration_merges_declared_fields() {
        let (persistence, mut store) = store();
        let first = ToolConfiguration::from([("region".to_string(), "us-east-1".to_string())]);
        store.save_tool_configuration("AWS_S3", first).unwrap();
        let second = ToolConfiguration::from([("accessKeyId".to_string(), "AKIA".to_string())]);
        let saved = store.save_tool_configuration("AWS_S3", second).unwrap();
        assert_eq!(saved.len(), 2);

        let bad = ToolConfiguration::from([("password".to_string(), "x".to_string())]);
        assert!(store.save_tool_configuration("AWS_S3", bad).is_err());

        let reloaded = AgentStore::load(persistence);
        assert_eq!(reloaded.tool_configuration("AWS_S3").len(), 2);
    }

    #[test]
    fn test_corrupt_document_falls_back() {
        let persistence = Arc::new(InMemoryPersistence::new());
        persistence.save(AGENTS_KEY, &json!({"not": "a list"})).unwrap();
        let store = AgentStore::load(persistence);
        assert_eq!(store.agents().len(), 2);
    }

    #[test]
    fn test_load_fresh_ignores_persisted_agents() {
        let (persistence, mut store) = store();
        store.insert(Agent::new("Extra", "Another goal long enough", Vec::new()));
        let fresh = AgentStore::load_fresh(persistence);
        assert_eq!(fresh.agents().len(), 2);
    }

    struct BrokenPersistence;

    impl PersistencePort for BrokenPersistence {
        fn load(&self, _key: &str) -> Result<Option<Value>, PersistenceError> {
            Ok(None)
        }

        fn save(&self, key: &str, _value: &Value) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn test_write_failure_keeps_memory_change() {
        let mut store = AgentStore::load(Arc::new(BrokenPersistence));
        store.insert(Agent::new("Kept", "Survives a failing disk", Vec::new()));
        assert_eq!(store.agents().len(), 3);
    }
}
