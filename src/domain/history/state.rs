//! Capped, date-keyed history container.

use super::HistoryEntry;
use chrono::NaiveDate;

/// Maximum number of daily entries retained.
pub const HISTORY_CAP: usize = 30;

/// Ordered history log, oldest first, at most one entry per calendar day.
///
/// Eviction is oldest-first once the cap is exceeded. The log itself is a
/// plain in-memory container; persistence lives in [`super::store`].
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    cap: usize,
}

impl HistoryLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Rebuild a log from persisted entries, trimming to the newest `cap`.
    pub fn from_entries(mut entries: Vec<HistoryEntry>, cap: usize) -> Self {
        if entries.len() > cap {
            entries.drain(..entries.len() - cap);
        }
        Self { entries, cap }
    }

    /// Insert or replace the entry for `entry.date`.
    ///
    /// A same-day entry is replaced in place, preserving its position; a new
    /// day is appended. The log is then trimmed to the newest `cap` entries.
    pub fn upsert(&mut self, entry: HistoryEntry) {
        match self.entries.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        if self.entries.len() > self.cap {
            self.entries.drain(..self.entries.len() - self.cap);
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HistoryEntry> {
        self.entries
    }

    /// The most recent entry, if any.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// The entry before the most recent one.
    pub fn previous(&self) -> Option<&HistoryEntry> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    pub fn get(&self, date: NaiveDate) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
