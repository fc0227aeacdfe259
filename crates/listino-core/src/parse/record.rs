//! Product record building: description cleanup and batch deduplication.

use std::collections::HashMap;

use tracing::debug;

use crate::models::product::ProductRecord;

use super::patterns::{DESCRIPTION_BOILERPLATE, SEPARATOR_RUN, WHITESPACE_RUN};

/// Clean a raw description taken from the text preceding the chosen price.
///
/// Strips everything from the first trailing boilerplate token (codes, lot
/// numbers, packaging and unit-of-measure abbreviations) to the end, turns
/// separator punctuation into spaces, and collapses whitespace.
pub fn clean_description(raw: &str) -> String {
    let cleaned = DESCRIPTION_BOILERPLATE.replace(raw, " ");
    let cleaned = SEPARATOR_RUN.replace_all(&cleaned, " ");
    WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string()
}

/// Derive a description from the line text before `price_offset`.
///
/// Returns `None` when the cleaned description is shorter than
/// `min_name_len`; such a line is noise, not a product.
pub fn build_description(line: &str, price_offset: usize, min_name_len: usize) -> Option<String> {
    let name = clean_description(line[..price_offset].trim());
    if name.chars().count() < min_name_len {
        return None;
    }
    Some(name)
}

/// Deduplicate a batch by identity key, preserving first-occurrence order.
///
/// When two lines collide on the same identity, the later line's record
/// overwrites the earlier one in place.
pub fn dedup_records(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut out: Vec<ProductRecord> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = record.identity_key();
        match index.get(&key) {
            Some(&i) => {
                debug!("Duplicate identity {key}, keeping the later line");
                out[i] = record;
            }
            None => {
                index.insert(key, out.len());
                out.push(record);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::VatClass;
    use pretty_assertions::assert_eq;

    fn record(name: &str, vat: Option<VatClass>) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: None,
            vat,
            supplier: None,
            source_date: None,
        }
    }

    #[test]
    fn test_clean_description_strips_boilerplate() {
        assert_eq!(
            clean_description("MELE GRANNY SMITH cal 70/75 colli 2"),
            "MELE GRANNY SMITH"
        );
        assert_eq!(clean_description("FINOCCHIO | blue •"), "FINOCCHIO blue");
        assert_eq!(clean_description("RADICCHIO lotto 442 kg 5"), "RADICCHIO");
    }

    #[test]
    fn test_build_description_rejects_short_names() {
        let line = "ab 1,20 4%";
        assert_eq!(build_description(line, 3, 3), None);

        let line = "MELONI JOLLY 1,60 4%";
        assert_eq!(build_description(line, 13, 3), Some("MELONI JOLLY".to_string()));
    }

    #[test]
    fn test_dedup_later_line_wins() {
        let records = vec![
            record("MELE GOLDEN", Some(VatClass::SuperReduced4)),
            record("FINOCCHIO", Some(VatClass::SuperReduced4)),
            record("mele golden", Some(VatClass::SuperReduced4)),
        ];

        let deduped = dedup_records(records);
        assert_eq!(deduped.len(), 2);
        // First-occurrence position, later content.
        assert_eq!(deduped[0].name, "mele golden");
        assert_eq!(deduped[1].name, "FINOCCHIO");
    }

    #[test]
    fn test_dedup_distinguishes_vat_classes() {
        let records = vec![
            record("PATATE", Some(VatClass::SuperReduced4)),
            record("PATATE", Some(VatClass::Reduced10)),
            record("PATATE", None),
        ];

        assert_eq!(dedup_records(records).len(), 3);
    }
}
