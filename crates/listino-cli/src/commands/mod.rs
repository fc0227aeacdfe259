//! CLI subcommands.

pub mod history;
pub mod import;
pub mod parse;

use std::path::{Path, PathBuf};

use listino_core::{JsonFileStore, ListinoConfig, PriceHistory};

/// Resolved session context: configuration plus the history store path.
pub struct Context {
    pub config: ListinoConfig,
    pub store_path: PathBuf,
}

impl Context {
    /// Resolve config and store path from the global flags.
    ///
    /// Store path precedence: `--store` flag, then the config file's
    /// `history.store_path`, then the user data directory.
    pub fn resolve(config_flag: Option<&Path>, store_flag: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_flag {
            Some(path) => ListinoConfig::from_file(path)?,
            None => ListinoConfig::default(),
        };

        let store_path = if let Some(path) = store_flag {
            path.to_path_buf()
        } else if config_flag.is_some() {
            config.history.store_path.clone()
        } else {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("listino")
                .join("listino.json")
        };

        Ok(Self { config, store_path })
    }

    /// Open the price history at the resolved path.
    pub fn open_history(&self) -> PriceHistory<JsonFileStore> {
        PriceHistory::open(JsonFileStore::new(self.store_path.clone()))
    }
}
