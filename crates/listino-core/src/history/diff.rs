//! Diff engine: classify a new batch against a pre-upsert snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::history::HistoryEntry;
use crate::models::product::ProductRecord;

/// Classification of one diff entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Identity already present, price moved beyond the epsilon.
    Changed,
    /// Identity absent from the snapshot.
    New,
}

/// One entry of an import diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Product description from the new batch.
    pub name: String,

    /// Identity key.
    pub key: String,

    /// Classification.
    pub kind: DiffKind,

    /// Price from the snapshot, when the identity was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,

    /// Price from the new batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_price: Option<Decimal>,

    /// new − old, when both prices are known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<Decimal>,

    /// delta / old × 100, blank when the old price is zero or absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
}

/// Price movements below this threshold are negligible.
fn epsilon() -> Decimal {
    Decimal::new(5, 3)
}

/// Compare a batch against a snapshot taken strictly before its upsert.
///
/// Unchanged records are omitted entirely. Output holds all `Changed`
/// entries first, then all `New` entries, each bucket ascending by
/// lowercased description.
pub fn diff_against_snapshot(
    snapshot: &BTreeMap<String, HistoryEntry>,
    records: &[ProductRecord],
) -> Vec<DiffEntry> {
    let mut changed = Vec::new();
    let mut added = Vec::new();

    for record in records {
        let key = record.identity_key();
        match snapshot.get(&key) {
            None => added.push(DiffEntry {
                name: record.name.clone(),
                key,
                kind: DiffKind::New,
                old_price: None,
                new_price: record.price,
                delta: None,
                percent: None,
            }),
            Some(old) => {
                // With no new price there is nothing to compare against.
                let Some(new_price) = record.price else {
                    continue;
                };

                let (delta, percent) = match old.price {
                    Some(old_price) => {
                        let delta = new_price - old_price;
                        if delta.abs() <= epsilon() {
                            continue;
                        }
                        let percent = if old_price.is_zero() {
                            None
                        } else {
                            Some((delta / old_price * Decimal::ONE_HUNDRED).round_dp(2))
                        };
                        (Some(delta), percent)
                    }
                    // Known identity gaining its first price still counts
                    // as a change, with nothing to compute a delta from.
                    None => (None, None),
                };

                changed.push(DiffEntry {
                    name: record.name.clone(),
                    key,
                    kind: DiffKind::Changed,
                    old_price: old.price,
                    new_price: Some(new_price),
                    delta,
                    percent,
                });
            }
        }
    }

    changed.sort_by_key(|e| e.name.to_lowercase());
    added.sort_by_key(|e| e.name.to_lowercase());
    debug!("Diff: {} changed, {} new", changed.len(), added.len());

    changed.extend(added);
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::VatClass;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(name: &str, price: &str, vat: Option<VatClass>) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: Some(dec(price)),
            vat,
            supplier: None,
            source_date: None,
        }
    }

    fn snapshot_of(entries: &[(&str, &str)]) -> BTreeMap<String, HistoryEntry> {
        entries
            .iter()
            .map(|(name, price)| {
                let key = format!("{}|", name.to_lowercase());
                (
                    key.clone(),
                    HistoryEntry {
                        key,
                        name: name.to_string(),
                        price: Some(dec(price)),
                        vat: None,
                        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                        supplier: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_equal_price_is_omitted() {
        let snapshot = snapshot_of(&[("FINOCCHIO", "10.00")]);
        let diff = diff_against_snapshot(&snapshot, &[record("FINOCCHIO", "10.00", None)]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_changed_price_delta_and_percent() {
        let snapshot = snapshot_of(&[("FINOCCHIO", "10.00")]);
        let diff = diff_against_snapshot(&snapshot, &[record("FINOCCHIO", "11.00", None)]);

        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].kind, DiffKind::Changed);
        assert_eq!(diff[0].delta, Some(dec("1.00")));
        assert_eq!(diff[0].percent, Some(dec("10.00")));
    }

    #[test]
    fn test_zero_old_price_has_no_percent() {
        let snapshot = snapshot_of(&[("OMAGGIO", "0.00")]);
        let diff = diff_against_snapshot(&snapshot, &[record("OMAGGIO", "1.00", None)]);

        assert_eq!(diff[0].delta, Some(dec("1.00")));
        assert_eq!(diff[0].percent, None);
    }

    #[test]
    fn test_new_identity_classified_new() {
        let snapshot = snapshot_of(&[]);
        let diff = diff_against_snapshot(&snapshot, &[record("ZUCCHINE", "3.20", None)]);

        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].kind, DiffKind::New);
        assert_eq!(diff[0].old_price, None);
    }

    #[test]
    fn test_same_name_other_vat_is_new() {
        let snapshot = snapshot_of(&[("PATATE", "1.10")]);
        let diff = diff_against_snapshot(
            &snapshot,
            &[record("PATATE", "1.10", Some(VatClass::SuperReduced4))],
        );

        assert_eq!(diff[0].kind, DiffKind::New);
    }

    #[test]
    fn test_ordering_changed_before_new_alphabetical() {
        let snapshot = snapshot_of(&[("ZUCCHINE", "3.00"), ("MELE", "2.00")]);
        let records = vec![
            record("ZUCCHINE", "3.50", None),
            record("pere", "1.50", None),
            record("MELE", "2.50", None),
            record("ALBICOCCHE", "4.00", None),
        ];

        let diff = diff_against_snapshot(&snapshot, &records);
        let names: Vec<&str> = diff.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["MELE", "ZUCCHINE", "ALBICOCCHE", "pere"]);
        assert_eq!(diff[0].kind, DiffKind::Changed);
        assert_eq!(diff[3].kind, DiffKind::New);
    }

    #[test]
    fn test_negligible_movement_is_omitted() {
        let snapshot = snapshot_of(&[("MELE", "2.00")]);
        // Within the 0.005 epsilon.
        let diff = diff_against_snapshot(&snapshot, &[record("MELE", "2.004", None)]);
        assert!(diff.is_empty());
    }
}
