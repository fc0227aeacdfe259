//! Price history: identity-keyed latest prices with an import log.

pub mod diff;
pub mod store;

pub use diff::{diff_against_snapshot, DiffEntry, DiffKind};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::history::{HistoryEntry, ImportLogEntry, ImportMeta};
use crate::models::product::ProductRecord;

const HISTORY_KEY: &str = "price_history";
const LOG_KEY: &str = "import_log";

/// Identity-keyed price history backed by a key-value collaborator.
///
/// Holds at most one entry per identity, latest import wins. Batches must
/// be processed sequentially: each batch's diff is computed against a
/// snapshot taken strictly before that batch's own upsert.
pub struct PriceHistory<S: KeyValueStore> {
    store: S,
    entries: BTreeMap<String, HistoryEntry>,
    log: Vec<ImportLogEntry>,
}

impl<S: KeyValueStore> PriceHistory<S> {
    /// Open the history from a key-value store.
    ///
    /// Missing or corrupt persisted collections load as empty with a
    /// warning; opening never fails.
    pub fn open(store: S) -> Self {
        let entries = load_collection::<BTreeMap<String, HistoryEntry>>(&store, HISTORY_KEY);
        let log = load_collection::<Vec<ImportLogEntry>>(&store, LOG_KEY);

        debug!(
            "Opened price history: {} entries, {} logged imports",
            entries.len(),
            log.len()
        );
        Self {
            store,
            entries,
            log,
        }
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Immutable snapshot of the store, used as a diff baseline.
    pub fn snapshot(&self) -> BTreeMap<String, HistoryEntry> {
        self.entries.clone()
    }

    /// Store contents sorted ascending by identity key.
    pub fn sorted_entries(&self) -> Vec<HistoryEntry> {
        self.entries.values().cloned().collect()
    }

    /// The import log, oldest first.
    pub fn import_log(&self) -> &[ImportLogEntry] {
        &self.log
    }

    /// Insert or replace one entry per record, as a single atomic batch.
    ///
    /// Each entry takes the record's price and VAT plus the batch metadata.
    /// A record without VAT clears any previously stored class; VAT is
    /// never backfilled from an older entry. One import log entry is
    /// appended listing the touched identities. Nothing is committed if
    /// persisting fails.
    ///
    /// Returns the full store contents sorted by identity key.
    pub fn upsert(
        &mut self,
        records: &[ProductRecord],
        meta: &ImportMeta,
    ) -> Result<Vec<HistoryEntry>> {
        let mut staged = self.entries.clone();
        let mut touched = Vec::with_capacity(records.len());

        for record in records {
            let key = record.identity_key();
            let entry = HistoryEntry {
                key: key.clone(),
                name: record.name.clone(),
                price: record.price,
                vat: record.vat,
                date: meta.date,
                supplier: meta.supplier.clone(),
            };
            if !touched.contains(&key) {
                touched.push(key.clone());
            }
            staged.insert(key, entry);
        }

        let mut log = self.log.clone();
        log.push(ImportLogEntry {
            meta: meta.clone(),
            touched,
        });

        self.persist(&staged, &log)?;
        self.entries = staged;
        self.log = log;

        info!(
            "Upserted {} records, store now holds {} identities",
            records.len(),
            self.entries.len()
        );
        Ok(self.sorted_entries())
    }

    /// Undo the most recent import.
    ///
    /// Removes exactly the identities that import touched and pops its log
    /// entry. An entry the import overwrote is not restored; only removal
    /// is rolled back. No-op when the log is empty.
    pub fn undo_last_import(&mut self) -> Result<()> {
        let Some(last) = self.log.last().cloned() else {
            warn!("No import to undo");
            return Ok(());
        };

        let mut staged = self.entries.clone();
        for key in &last.touched {
            staged.remove(key);
        }
        let mut log = self.log.clone();
        log.pop();

        self.persist(&staged, &log)?;
        self.entries = staged;
        self.log = log;

        info!(
            "Undid import of {} ({} identities removed)",
            last.meta.date,
            last.touched.len()
        );
        Ok(())
    }

    fn persist(
        &mut self,
        entries: &BTreeMap<String, HistoryEntry>,
        log: &[ImportLogEntry],
    ) -> Result<()> {
        let entries_json = serde_json::to_value(entries)
            .map_err(|e| crate::error::HistoryError::Serialize(e.to_string()))?;
        let log_json = serde_json::to_value(log)
            .map_err(|e| crate::error::HistoryError::Serialize(e.to_string()))?;

        self.store.set(HISTORY_KEY, entries_json)?;
        self.store.set(LOG_KEY, log_json)
    }
}

/// Load one persisted collection, treating anything unreadable as empty.
fn load_collection<T: serde::de::DeserializeOwned + Default>(
    store: &impl KeyValueStore,
    key: &str,
) -> T {
    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!("Failed to read {key}, starting empty: {e}");
            return T::default();
        }
    };

    match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Corrupt {key} in store, starting empty: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::VatClass;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn record(name: &str, price: &str, vat: Option<VatClass>) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: Some(Decimal::from_str(price).unwrap()),
            vat,
            supplier: None,
            source_date: None,
        }
    }

    fn meta(date: &str, supplier: Option<&str>) -> ImportMeta {
        ImportMeta {
            date: NaiveDate::from_str(date).unwrap(),
            supplier: supplier.map(str::to_string),
        }
    }

    #[test]
    fn test_upsert_returns_sorted_store() {
        let mut history = PriceHistory::open(MemoryStore::new());
        let records = vec![
            record("ZUCCHINE", "3.20", Some(VatClass::SuperReduced4)),
            record("MELE GOLDEN", "2.10", Some(VatClass::SuperReduced4)),
        ];

        let entries = history.upsert(&records, &meta("2024-03-01", Some("BIANCHIN"))).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "mele golden|4");
        assert_eq!(entries[1].key, "zucchine|4");
        assert_eq!(entries[0].supplier.as_deref(), Some("BIANCHIN"));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut history = PriceHistory::open(MemoryStore::new());
        let records = vec![record("FINOCCHIO", "0.60", Some(VatClass::SuperReduced4))];
        let m = meta("2024-03-01", None);

        let first = history.upsert(&records, &m).unwrap();
        let second = history.upsert(&records, &m).unwrap();

        assert_eq!(first, second);
        assert_eq!(history.len(), 1);
        assert_eq!(history.import_log().len(), 2);
    }

    #[test]
    fn test_upsert_never_backfills_vat() {
        let mut history = PriceHistory::open(MemoryStore::new());
        history
            .upsert(
                &[record("patate", "1.10", Some(VatClass::SuperReduced4))],
                &meta("2024-03-01", None),
            )
            .unwrap();

        // Same name parsed without VAT is a different identity; the old
        // entry stays and the new one stores no class.
        let entries = history
            .upsert(&[record("patate", "1.15", None)], &meta("2024-03-08", None))
            .unwrap();

        assert_eq!(entries.len(), 2);
        let no_vat = entries.iter().find(|e| e.key == "patate|").unwrap();
        assert_eq!(no_vat.vat, None);
        assert_eq!(no_vat.price, Some(Decimal::from_str("1.15").unwrap()));
    }

    #[test]
    fn test_undo_removes_only_last_import() {
        let mut history = PriceHistory::open(MemoryStore::new());
        history
            .upsert(
                &[record("MELE GOLDEN", "2.10", Some(VatClass::SuperReduced4))],
                &meta("2024-03-01", None),
            )
            .unwrap();
        history
            .upsert(
                &[record("ZUCCHINE", "3.20", Some(VatClass::Reduced10))],
                &meta("2024-03-08", None),
            )
            .unwrap();

        history.undo_last_import().unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history.sorted_entries()[0].key, "mele golden|4");
        assert_eq!(history.import_log().len(), 1);
    }

    #[test]
    fn test_undo_does_not_restore_overwritten_entries() {
        let mut history = PriceHistory::open(MemoryStore::new());
        let m1 = meta("2024-03-01", None);
        let m2 = meta("2024-03-08", None);

        history
            .upsert(&[record("FINOCCHIO", "0.60", Some(VatClass::SuperReduced4))], &m1)
            .unwrap();
        history
            .upsert(&[record("FINOCCHIO", "0.70", Some(VatClass::SuperReduced4))], &m2)
            .unwrap();

        // Documented limitation: the first import's entry is gone too.
        history.undo_last_import().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_undo_on_empty_log_is_noop() {
        let mut history = PriceHistory::open(MemoryStore::new());
        history.undo_last_import().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listino.json");

        let mut history = PriceHistory::open(JsonFileStore::new(&path));
        history
            .upsert(
                &[record("MELE GOLDEN", "2.10", Some(VatClass::SuperReduced4))],
                &meta("2024-03-01", Some("BIANCHIN")),
            )
            .unwrap();

        let reopened = PriceHistory::open(JsonFileStore::new(&path));
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.sorted_entries()[0].name, "MELE GOLDEN");
        assert_eq!(reopened.import_log().len(), 1);
    }

    #[test]
    fn test_corrupt_store_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listino.json");
        std::fs::write(&path, r#"{"price_history": "garbage"}"#).unwrap();

        let history = PriceHistory::open(JsonFileStore::new(&path));
        assert!(history.is_empty());
    }
}
