//! History domain — daily rate snapshots and their persistence.

pub mod state;
pub mod store;

use crate::domain::rates::RateRecord;
use crate::shared::timestamp_ms;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use state::{HistoryLog, HISTORY_CAP};
pub use store::{FileStore, HistoryStore, KvStore, MemoryStore};

/// One calendar day's rate snapshot.
///
/// The serialized shape is the persisted wire format: `date` as
/// `"YYYY-MM-DD"`, prices under their legacy `gold24k`/`gold22k`/`silver`
/// names, `timestamp` as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    #[serde(rename = "gold24k")]
    pub gold_24k: u32,
    #[serde(rename = "gold22k")]
    pub gold_22k: u32,
    pub silver: u32,
    #[serde(with = "timestamp_ms")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Narrow a rate record to one calendar day.
    pub fn from_record(record: &RateRecord, date: NaiveDate) -> Self {
        Self {
            date,
            gold_24k: record.gold_24k,
            gold_22k: record.gold_22k,
            silver: record.silver,
            timestamp: record.timestamp,
        }
    }

    /// Promote the entry back to a rate record, e.g. when replaying the
    /// newest entry as a fallback.
    pub fn to_record(&self, source: &str) -> RateRecord {
        RateRecord {
            gold_24k: self.gold_24k,
            gold_22k: self.gold_22k,
            silver: self.silver,
            timestamp: self.timestamp,
            source: source.to_string(),
        }
    }
}
