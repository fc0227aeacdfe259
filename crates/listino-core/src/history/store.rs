//! Persisted key-value collaborator for the price history.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::error::{HistoryError, ListinoError, Result};

/// The persisted key-value mechanism the history store writes through.
///
/// The core only needs JSON get/set; what backs it is a collaborator
/// concern. Missing keys are `Ok(None)`, never an error.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed store: one JSON object per file, keys at the top level.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store backed by the given file. The file is created on the
    /// first write; it does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<serde_json::Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(serde_json::Map::new());
            }
            Err(e) => {
                return Err(ListinoError::History(HistoryError::Read {
                    key: self.path.display().to_string(),
                    reason: e.to_string(),
                }));
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => {
                // Corrupt persisted JSON is treated as an empty collection.
                warn!(
                    "Store file {} is not a JSON object, treating as empty",
                    self.path.display()
                );
                Ok(serde_json::Map::new())
            }
        }
    }

    fn write_map(&self, map: &serde_json::Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&Value::Object(map.clone()))
            .map_err(|e| HistoryError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| {
            ListinoError::History(HistoryError::Write {
                key: self.path.display().to_string(),
                reason: e.to_string(),
            })
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("k", json!({"a": 1})).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("history").unwrap(), None);

        store.set("history", json!([1, 2, 3])).unwrap();
        store.set("log", json!([])).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("history").unwrap(), Some(json!([1, 2, 3])));
        assert_eq!(reopened.get("log").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_file_store_corrupt_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json {{{").unwrap();

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get("history").unwrap(), None);
    }
}
