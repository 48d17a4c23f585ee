//! Canonical rate domain — the record every provider normalizes into.

pub mod convert;
pub mod wire;

use crate::shared::{derive_purity_variant, round_price, GOLD_22K_PURITY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag for a record replayed from the newest history entry.
pub const SOURCE_FALLBACK_CACHE: &str = "fallback-cache";

/// Source tag for the hardcoded approximate record.
pub const SOURCE_FALLBACK_DEFAULT: &str = "fallback-default";

/// Canonical daily quote: whole INR per gram for each tracked metal/grade.
///
/// Invariants: all prices are non-negative and `gold_22k <= gold_24k`
/// (the 22k price is derived from the rounded 24k price via the purity
/// ratio, which is below 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRecord {
    /// 24-karat gold, INR per gram.
    pub gold_24k: u32,
    /// 22-karat gold, INR per gram — `round(gold_24k × 0.916)`.
    pub gold_22k: u32,
    /// Silver, INR per gram.
    pub silver: u32,
    /// Instant of acquisition.
    pub timestamp: DateTime<Utc>,
    /// Identifier of the producing provider, or a `fallback-*` tag.
    pub source: String,
}

impl RateRecord {
    /// Build a record from raw per-gram prices.
    ///
    /// Applies the crate-wide rounding policy and derives the 22k price from
    /// the already-rounded 24k price, which keeps both invariants exact.
    pub fn from_gram_prices(
        gold_per_gram: f64,
        silver_per_gram: f64,
        timestamp: DateTime<Utc>,
        source: &str,
    ) -> Self {
        let gold_24k = round_price(gold_per_gram);
        Self {
            gold_24k,
            gold_22k: derive_purity_variant(gold_24k, GOLD_22K_PURITY),
            silver: round_price(silver_per_gram),
            timestamp,
            source: source.to_string(),
        }
    }

    /// The hardcoded approximate record used when every provider is down and
    /// the history is empty.
    pub fn fallback_default(timestamp: DateTime<Utc>) -> Self {
        Self {
            gold_24k: 6850,
            gold_22k: 6275,
            silver: 85,
            timestamp,
            source: SOURCE_FALLBACK_DEFAULT.to_string(),
        }
    }
}
