//! Data models for products, history entries, and configuration.

pub mod config;
pub mod history;
pub mod product;

pub use config::{HistoryConfig, ListinoConfig, ParserConfig};
pub use history::{HistoryEntry, ImportLogEntry, ImportMeta};
pub use product::{identity_key, ProductRecord, VatClass};
