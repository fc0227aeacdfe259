//! Core library for Italian supplier invoice processing.
//!
//! This crate provides:
//! - Line normalization and OCR artifact repair for extracted invoice text
//! - Price/VAT token scanning and supplier-specific price disambiguation
//! - Product record building with batch deduplication
//! - A persisted price history with per-import diffs and single-level undo

pub mod error;
pub mod history;
pub mod models;
pub mod parse;

pub use error::{HistoryError, ListinoError, Result};
pub use history::{
    diff_against_snapshot, DiffEntry, DiffKind, JsonFileStore, KeyValueStore, MemoryStore,
    PriceHistory,
};
pub use models::config::{HistoryConfig, ListinoConfig, ParserConfig};
pub use models::history::{HistoryEntry, ImportLogEntry, ImportMeta};
pub use models::product::{identity_key, ProductRecord, VatClass};
pub use parse::{merge_numeric_pass, parse_invoice_text, InvoiceTextParser, ParseResult};
