//! JSON documents on disk, one file per key.
//!
//! `save("agents", ..)` writes `<dir>/agents.json`. Writes go to a temporary
//! sibling first and are renamed into place so a crash never leaves a
//! half-written document behind. Documents are stored compact, one line
//! each.

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use steward_application::{PersistenceError, PersistencePort};
use tracing::debug;

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PersistencePort for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, PersistenceError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    key: key.to_string(),
                    source,
                });
            }
        };
        let value = serde_json::from_str(&text).map_err(|source| PersistenceError::Corrupt {
            key: key.to_string(),
            source,
        })?;
        debug!(key, path = %path.display(), "Loaded document");
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), PersistenceError> {
        let io_error = |source| PersistenceError::Io {
            key: key.to_string(),
            source,
        };
        let bytes = serde_json::to_vec(value).map_err(|source| {
            PersistenceError::Corrupt {
                key: key.to_string(),
                source,
            }
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(io_error)?;
        fs::rename(&tmp, &path).map_err(io_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("data")).unwrap();

        assert!(store.load("agents").unwrap().is_none());
        store.save("agents", &json!([{"id": "a"}])).unwrap();
        assert_eq!(store.load("agents").unwrap(), Some(json!([{"id": "a"}])));
        assert!(dir.path().join("data/agents.json").exists());
        assert!(!dir.path().join("data/agents.json.tmp").exists());
    }

    #[test]
    fn test_documents_are_written_compact() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store
            .save("agents", &json!([{"id": "a", "tags": ["ops"]}, {"id": "b"}]))
            .unwrap();
        let text = fs::read_to_string(dir.path().join("agents.json")).unwrap();
        assert_eq!(text, r#"[{"id":"a","tags":["ops"]},{"id":"b"}]"#);
    }

    #[test]
    fn test_overwrite_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save("tools", &json!({"SlackAPI": true})).unwrap();
        store.save("tools", &json!({"SlackAPI": false})).unwrap();
        assert_eq!(store.load("tools").unwrap(), Some(json!({"SlackAPI": false})));
    }

    #[test]
    fn test_corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("agents.json"), "{not json").unwrap();
        assert!(matches!(
            store.load("agents"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }
}
