//! Persistence — string key-value backing store and the history store on top.
//!
//! The backing store is deliberately dumb: string keys to string values.
//! `HistoryStore` layers the typed history log and the last-update marker
//! over it.

use super::state::{HistoryLog, HISTORY_CAP};
use super::HistoryEntry;
use crate::domain::rates::RateRecord;
use crate::error::StoreError;
use crate::shared::{day_key, derive_purity_variant, round_price, GOLD_22K_PURITY};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key under which the history log is persisted.
pub const HISTORY_KEY: &str = "history";

/// Key under which the last successful refresh instant is persisted.
pub const LAST_UPDATE_KEY: &str = "last_update";

// ─── KvStore ─────────────────────────────────────────────────────────────────

/// String key-value backing store.
///
/// Implementations must tolerate concurrent readers; the tracker guarantees a
/// single mutator.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KvStore + ?Sized> KvStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// JSON-file-backed store: one file holding a flat string-to-string object.
///
/// Writes go through a temp file and rename so a crash mid-write never leaves
/// a half-written store behind. A missing or unparseable file reads as empty.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store file unparseable, treating as empty");
                Ok(HashMap::new())
            }
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        let serialized = serde_json::to_string_pretty(&map).map_err(StoreError::Serialize)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral trackers.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── HistoryStore ────────────────────────────────────────────────────────────

/// Typed history persistence over a [`KvStore`].
///
/// Read-path failures (unreadable store, corrupt payload) are absorbed as an
/// empty history — the store has no fatal read path. Only writes can error.
pub struct HistoryStore {
    kv: Box<dyn KvStore>,
    offset: FixedOffset,
}

impl HistoryStore {
    pub fn new(kv: Box<dyn KvStore>, offset: FixedOffset) -> Self {
        Self { kv, offset }
    }

    /// All persisted entries, oldest first. Corrupt or missing data reads as
    /// empty, never as an error.
    pub fn all(&self) -> Vec<HistoryEntry> {
        self.load().into_entries()
    }

    /// The most recent persisted entry.
    pub fn latest(&self) -> Option<HistoryEntry> {
        let log = self.load();
        log.latest().cloned()
    }

    /// Insert or replace the entry for the record's calendar day (under the
    /// store's local offset), trim to the cap, and persist.
    pub fn upsert(&self, record: &RateRecord) -> Result<(), StoreError> {
        let date = day_key(record.timestamp, self.offset);
        let mut log = self.load();
        log.upsert(HistoryEntry::from_record(record, date));
        self.persist(&log)
    }

    /// Bootstrap 7 synthetic daily entries ending today when the history is
    /// empty. Returns whether seeding happened; never overwrites real data.
    pub fn seed_if_empty(&self, now: DateTime<Utc>) -> Result<bool, StoreError> {
        if !self.load().is_empty() {
            return Ok(false);
        }

        let mut entries = Vec::with_capacity(7);
        for days_ago in (0..7).rev() {
            let timestamp = now - Duration::days(days_ago);
            let gold_variation = (rand::random::<f64>() - 0.5) * 100.0;
            let gold_24k = round_price(6850.0 + gold_variation);
            let silver_variation = (rand::random::<f64>() - 0.5) * 5.0;
            entries.push(HistoryEntry {
                date: day_key(timestamp, self.offset),
                gold_24k,
                gold_22k: derive_purity_variant(gold_24k, GOLD_22K_PURITY),
                silver: round_price(85.0 + silver_variation),
                timestamp,
            });
        }

        debug!(days = entries.len(), "seeding empty history with synthetic entries");
        self.persist(&HistoryLog::from_entries(entries, HISTORY_CAP))?;
        Ok(true)
    }

    /// Record the instant of the last completed refresh.
    pub fn mark_updated(&self, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.kv
            .set(LAST_UPDATE_KEY, &now.timestamp_millis().to_string())
    }

    /// The last completed refresh instant, if one was recorded and parses.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        let raw = self.kv.get(LAST_UPDATE_KEY).ok().flatten()?;
        let millis: i64 = match raw.parse() {
            Ok(ms) => ms,
            Err(_) => {
                warn!(value = %raw, "last-update marker unparseable, ignoring");
                return None;
            }
        };
        DateTime::<Utc>::from_timestamp_millis(millis)
    }

    fn load(&self) -> HistoryLog {
        let raw = match self.kv.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HistoryLog::new(HISTORY_CAP),
            Err(e) => {
                warn!(error = %e, "history unreadable, treating as empty");
                return HistoryLog::new(HISTORY_CAP);
            }
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => HistoryLog::from_entries(entries, HISTORY_CAP),
            Err(e) => {
                warn!(error = %e, "history corrupt, treating as empty");
                HistoryLog::new(HISTORY_CAP)
            }
        }
    }

    fn persist(&self, log: &HistoryLog) -> Result<(), StoreError> {
        let serialized =
            serde_json::to_string(log.entries()).map_err(StoreError::Serialize)?;
        self.kv.set(HISTORY_KEY, &serialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn record(day: u32, gold: u32) -> RateRecord {
        RateRecord {
            gold_24k: gold,
            gold_22k: (f64::from(gold) * 0.916).round() as u32,
            silver: 85,
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_upsert_is_idempotent_per_day() {
        let store = HistoryStore::new(Box::new(MemoryStore::new()), utc_offset());
        store.upsert(&record(1, 6800)).unwrap();
        store.upsert(&record(1, 6900)).unwrap();
        let all = store.all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].gold_24k, 6900);
    }

    #[test]
    fn test_cap_holds_across_persisted_upserts() {
        let store = HistoryStore::new(Box::new(MemoryStore::new()), utc_offset());
        for day in 1..=31 {
            store.upsert(&record(day, 6800 + day)).unwrap();
        }
        let all = store.all();
        assert_eq!(all.len(), HISTORY_CAP);
        assert_eq!(all[0].date, chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_day_key_uses_configured_offset() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let store = HistoryStore::new(Box::new(MemoryStore::new()), ist);
        let late_evening_utc = RateRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap(),
            ..record(1, 6800)
        };
        store.upsert(&late_evening_utc).unwrap();
        assert_eq!(
            store.all()[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_corrupt_history_reads_as_empty() {
        let kv = MemoryStore::new();
        kv.set(HISTORY_KEY, "not json at all").unwrap();
        let store = HistoryStore::new(Box::new(kv), utc_offset());
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_seed_creates_seven_days_and_never_overwrites() {
        let store = HistoryStore::new(Box::new(MemoryStore::new()), utc_offset());
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

        assert!(store.seed_if_empty(now).unwrap());
        let seeded = store.all();
        assert_eq!(seeded.len(), 7);
        assert_eq!(seeded[0].date, chrono::NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(seeded[6].date, chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        for entry in &seeded {
            assert!((6800..=6900).contains(&entry.gold_24k));
            assert!((82..=88).contains(&entry.silver));
            assert!(entry.gold_22k <= entry.gold_24k);
        }

        assert!(!store.seed_if_empty(now).unwrap());
        assert_eq!(store.all(), seeded);
    }

    #[test]
    fn test_last_update_round_trip() {
        let store = HistoryStore::new(Box::new(MemoryStore::new()), utc_offset());
        assert!(store.last_update().is_none());
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        store.mark_updated(now).unwrap();
        assert_eq!(store.last_update(), Some(now));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");
        let file = FileStore::new(&path);
        assert!(file.get(HISTORY_KEY).unwrap().is_none());
        file.set(HISTORY_KEY, "[1,2,3]").unwrap();
        file.set(LAST_UPDATE_KEY, "1700000000000").unwrap();
        assert_eq!(file.get(HISTORY_KEY).unwrap().unwrap(), "[1,2,3]");

        // A fresh handle over the same path sees the persisted values.
        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get(LAST_UPDATE_KEY).unwrap().unwrap(),
            "1700000000000"
        );
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, "{{{{ definitely not json").unwrap();
        let file = FileStore::new(&path);
        assert!(file.get(HISTORY_KEY).unwrap().is_none());
    }
}
