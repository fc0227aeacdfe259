//! Invoice text parsing pipeline.
//!
//! Raw OCR or PDF text goes through line normalization, token scanning,
//! supplier detection, price disambiguation, and record building, yielding
//! an ordered, deduplicated batch of product records.

pub mod merge;
pub mod normalize;
pub mod patterns;
pub mod record;
pub mod supplier;
pub mod tokens;

pub use merge::merge_numeric_pass;
pub use normalize::{is_noise_line, normalize_lines, repair_ocr_text, RawLine};
pub use supplier::{detect_supplier, generic_rule, PriceRule, SupplierProfile};
pub use tokens::{parse_price_value, scan_prices, scan_vats, PriceToken, VatToken};

use tracing::{debug, info};

use crate::models::config::ParserConfig;
use crate::models::product::ProductRecord;

/// Result of parsing one invoice document.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Ordered, deduplicated product records.
    pub records: Vec<ProductRecord>,
    /// Supplier label, when the document fingerprint matched.
    pub supplier: Option<String>,
}

/// Parser for free text extracted from supplier invoices.
pub struct InvoiceTextParser {
    config: ParserConfig,
}

impl InvoiceTextParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with the given configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a text block into product records.
    ///
    /// Unparsable lines are skipped silently; a document that yields no
    /// records is an empty batch, not an error.
    pub fn parse(&self, text: &str) -> ParseResult {
        let profile = detect_supplier(text);
        let rule = profile.map(|p| p.rule).unwrap_or_else(generic_rule);
        let supplier = profile.map(|p| p.label.to_string());

        let repaired = repair_ocr_text(text);
        let lines = normalize_lines(&repaired, self.config.min_line_len);

        let mut records = Vec::new();
        for line in &lines {
            if let Some(rec) = self.parse_line(line, rule, supplier.as_deref()) {
                records.push(rec);
            }
        }

        let records = record::dedup_records(records);
        info!(
            "Parsed {} product records from {} candidate lines",
            records.len(),
            lines.len()
        );

        ParseResult { records, supplier }
    }

    fn parse_line(
        &self,
        line: &RawLine,
        rule: &dyn PriceRule,
        supplier: Option<&str>,
    ) -> Option<ProductRecord> {
        if !line.text.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }

        let vats = scan_vats(&line.text);
        let last_vat = tokens::last_vat(&vats);

        let prices = scan_prices(&line.text);
        let chosen = rule.choose(&prices, last_vat)?;

        let name = record::build_description(&line.text, chosen.offset, self.config.min_name_len)?;
        debug!(
            "Line {}: '{}' -> {} @ {:?}",
            line.index,
            name,
            chosen.raw,
            last_vat.map(|v| v.class)
        );

        Some(ProductRecord {
            name,
            price: Some(chosen.value),
            vat: last_vat.map(|v| v.class),
            supplier: supplier.map(str::to_string),
            source_date: None,
        })
    }
}

impl Default for InvoiceTextParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse invoice text with default settings.
pub fn parse_invoice_text(text: &str) -> Vec<ProductRecord> {
    InvoiceTextParser::new().parse(text).records
}
