//! Merging a numeric-restricted second OCR pass into first-pass records.

use tracing::debug;

use crate::models::product::ProductRecord;

/// First whitespace-separated word of a lowercased name.
fn first_word(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Merge records from a numeric-restricted OCR pass into the primary batch.
///
/// The numeric pass produces mangled descriptions, so matching is by the
/// first word of the lowercased name only. A field already present in the
/// primary record is never overwritten; only gaps are filled. Secondary
/// records with no match are dropped.
pub fn merge_numeric_pass(primary: &mut [ProductRecord], secondary: Vec<ProductRecord>) {
    for extra in secondary {
        let word = first_word(&extra.name);
        if word.is_empty() {
            continue;
        }

        let Some(target) = primary.iter_mut().find(|r| first_word(&r.name) == word) else {
            continue;
        };

        if target.price.is_none() && extra.price.is_some() {
            debug!("Numeric pass filled price for {}", target.name);
            target.price = extra.price;
        }
        if target.vat.is_none() && extra.vat.is_some() {
            debug!("Numeric pass filled VAT for {}", target.name);
            target.vat = extra.vat;
        }
    }
}
