//! Product record model shared by the parser, history store, and diff engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Italian VAT classes applicable to an invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VatClass {
    /// Super-reduced rate: 4%
    #[serde(rename = "4")]
    SuperReduced4,

    /// Reduced rate: 5%
    #[serde(rename = "5")]
    Reduced5,

    /// Reduced rate: 10%
    #[serde(rename = "10")]
    Reduced10,

    /// Standard rate: 22%
    #[serde(rename = "22")]
    Standard22,
}

impl VatClass {
    /// Get the percentage value of this class.
    pub fn as_u8(&self) -> u8 {
        match self {
            VatClass::SuperReduced4 => 4,
            VatClass::Reduced5 => 5,
            VatClass::Reduced10 => 10,
            VatClass::Standard22 => 22,
        }
    }

    /// Map a percentage value onto a legal class.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            4 => Some(VatClass::SuperReduced4),
            5 => Some(VatClass::Reduced5),
            10 => Some(VatClass::Reduced10),
            22 => Some(VatClass::Standard22),
            _ => None,
        }
    }

    /// Parse a scanned VAT token body ("4", "04", "4,0", "22%", "IVA 10").
    ///
    /// Digits are collapsed and reduced modulo 100, the way OCR output with a
    /// stray leading digit still lands on the intended class. Anything outside
    /// the four legal classes yields `None`.
    pub fn from_token(s: &str) -> Option<Self> {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        let n: u32 = digits.parse().ok()?;
        u8::try_from(n % 100).ok().and_then(Self::from_u8)
    }

    /// Format for display ("4%", "22%").
    pub fn display(&self) -> String {
        format!("{}%", self.as_u8())
    }
}

/// A single product line extracted from one invoice document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Cleaned product description.
    pub name: String,

    /// Unit price, when a price token was found (2 fractional digits).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// VAT class, when a VAT token was found on the line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat: Option<VatClass>,

    /// Supplier label from the document fingerprint, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Date of the source document, filled in at import time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_date: Option<NaiveDate>,
}

impl ProductRecord {
    /// Identity key: lowercased name plus VAT class (empty when absent).
    ///
    /// Used for batch dedup and as the history store key, so the same product
    /// parsed under two VAT classes is tracked as two identities.
    pub fn identity_key(&self) -> String {
        identity_key(&self.name, self.vat)
    }
}

/// Build an identity key from a name and an optional VAT class.
pub fn identity_key(name: &str, vat: Option<VatClass>) -> String {
    match vat {
        Some(v) => format!("{}|{}", name.to_lowercase(), v.as_u8()),
        None => format!("{}|", name.to_lowercase()),
    }
}
