//! Shared constants and pure conversion helpers used across all domain modules.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

/// Grams per troy ounce — fixed physical constant.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// 22-karat gold purity relative to 24-karat (91.6%).
pub const GOLD_22K_PURITY: f64 = 0.916;

// ─── Unit conversion ─────────────────────────────────────────────────────────

/// Convert a price-per-troy-ounce quote to price-per-gram.
pub fn gram_price_from_troy_ounce(price_per_ounce: f64) -> f64 {
    price_per_ounce / GRAMS_PER_TROY_OUNCE
}

/// Round a raw per-gram price to the nearest whole currency unit.
///
/// `f64::round` (half away from zero) is the single rounding policy for every
/// price derivation in the crate.
pub fn round_price(price: f64) -> u32 {
    price.round().max(0.0) as u32
}

/// Derive a lower-purity price from an already-rounded 24k price.
///
/// Deriving from the rounded integer (not the raw float) keeps the
/// `gold_22k <= gold_24k` invariant exact: the ratio is below 1, so the
/// rounded product can never exceed the input.
pub fn derive_purity_variant(price_24k: u32, purity_ratio: f64) -> u32 {
    round_price(f64::from(price_24k) * purity_ratio)
}

// ─── Calendar day keying ─────────────────────────────────────────────────────

/// Map an instant to its calendar day under the given local offset.
///
/// The offset is explicit (not ambient) so tests can pin a timezone.
pub fn day_key(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    timestamp.with_timezone(&offset).date_naive()
}

/// The system's current local UTC offset.
pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// Serializes `DateTime<Utc>` as epoch milliseconds (i64).
///
/// The persisted history format stores `timestamp` as an epoch-millis
/// integer, not an ISO 8601 string.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(dt.timestamp_millis())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", millis)))
    }
}
