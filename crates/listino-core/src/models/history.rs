//! History store models: entries, import metadata, and the import log.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::VatClass;

/// Latest known state of one product identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identity key this entry is stored under.
    pub key: String,

    /// Product description as it appeared in the most recent import.
    pub name: String,

    /// Latest known unit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Latest known VAT class. Empty when the latest import lacked one;
    /// never backfilled from an older entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat: Option<VatClass>,

    /// Date of the import that wrote this entry.
    pub date: NaiveDate,

    /// Supplier label of the import that wrote this entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// Metadata for one import batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportMeta {
    /// Date of the source document.
    pub date: NaiveDate,

    /// Supplier label, when detected or supplied by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

/// One entry in the import log, appended per upsert batch.
///
/// Holds the identities touched by the batch, which is what single-level
/// undo needs: removing exactly those keys rolls the batch back, except
/// that an entry the batch overwrote is not restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportLogEntry {
    /// Batch metadata.
    pub meta: ImportMeta,

    /// Identity keys inserted or replaced by this batch.
    pub touched: Vec<String>,
}
