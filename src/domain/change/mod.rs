//! Day-over-day change domain.

use crate::domain::history::HistoryEntry;
use serde::{Deserialize, Serialize};

/// Sign of a day-over-day delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

/// Delta for a single tracked price field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// `current − previous`, in whole currency units.
    pub absolute: i64,
    /// `absolute / previous × 100`; `None` when the previous value is zero.
    pub percent: Option<f64>,
    pub direction: Direction,
}

impl FieldChange {
    pub fn between(current: u32, previous: u32) -> Self {
        let absolute = i64::from(current) - i64::from(previous);
        let percent = if previous == 0 {
            None
        } else {
            Some(absolute as f64 / f64::from(previous) * 100.0)
        };
        let direction = match absolute.cmp(&0) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => Direction::Unchanged,
        };
        Self {
            absolute,
            percent,
            direction,
        }
    }
}

/// Per-field deltas between the two most recent history entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub gold_24k: FieldChange,
    pub gold_22k: FieldChange,
    pub silver: FieldChange,
}

impl ChangeReport {
    /// Compare the last two entries of an ordered (oldest-first) history.
    ///
    /// Fewer than two entries is a normal state for a new history, not an
    /// error — `None` signals insufficient data.
    pub fn from_history(entries: &[HistoryEntry]) -> Option<Self> {
        let [.., previous, current] = entries else {
            return None;
        };
        Some(Self::between(current, previous))
    }

    pub fn between(current: &HistoryEntry, previous: &HistoryEntry) -> Self {
        Self {
            gold_24k: FieldChange::between(current.gold_24k, previous.gold_24k),
            gold_22k: FieldChange::between(current.gold_22k, previous.gold_22k),
            silver: FieldChange::between(current.silver, previous.silver),
        }
    }
}
