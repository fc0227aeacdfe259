//! Configuration structures for the parsing pipeline and history store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the listino pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListinoConfig {
    /// Invoice text parsing configuration.
    pub parser: ParserConfig,

    /// Price history configuration.
    pub history: HistoryConfig,
}

/// Invoice text parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Minimum cleaned line length; shorter lines are treated as noise.
    pub min_line_len: usize,

    /// Minimum cleaned description length for a valid product record.
    pub min_name_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_line_len: 6,
            min_name_len: 3,
        }
    }
}

/// Price history configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path of the JSON file backing the persisted store.
    pub store_path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("listino.json"),
        }
    }
}

impl ListinoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ListinoConfig::default();
        config.parser.min_name_len = 5;
        config.history.store_path = PathBuf::from("/tmp/listino.json");
        config.save(&path).unwrap();

        let loaded = ListinoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.parser.min_name_len, 5);
        assert_eq!(loaded.history.store_path, PathBuf::from("/tmp/listino.json"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ListinoConfig =
            serde_json::from_str(r#"{"parser": {"min_line_len": 8}}"#).unwrap();
        assert_eq!(config.parser.min_line_len, 8);
        assert_eq!(config.parser.min_name_len, 3);
    }
}
