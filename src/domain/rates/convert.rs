//! Conversion: provider wire types → `RateRecord` (validation + unit normalization).

use super::wire::{MetalpriceResponse, MetalsDevResponse};
use super::RateRecord;
use crate::error::Unavailable;
use crate::shared::gram_price_from_troy_ounce;
use chrono::{DateTime, Utc};

impl MetalpriceResponse {
    /// Normalize a MetalpriceAPI response into a canonical record.
    ///
    /// `XAU`/`XAG` arrive as troy ounces of metal per USD, so the quote is
    /// inverted to USD per ounce, converted to INR via the `INR` rate, then
    /// to per-gram.
    pub fn into_record(
        self,
        timestamp: DateTime<Utc>,
        source: &str,
    ) -> Result<RateRecord, Unavailable> {
        if !self.success {
            return Err(Unavailable::Schema("success flag false".to_string()));
        }
        let rates = self
            .rates
            .ok_or_else(|| Unavailable::Schema("missing rates object".to_string()))?;

        // Inverse quotes: a zero or non-finite rate cannot be inverted.
        for (label, value) in [("XAU", rates.xau), ("XAG", rates.xag), ("INR", rates.inr)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Unavailable::Schema(format!("invalid {} rate: {}", label, value)));
            }
        }

        let gold_per_ounce_inr = (1.0 / rates.xau) * rates.inr;
        let silver_per_ounce_inr = (1.0 / rates.xag) * rates.inr;

        Ok(RateRecord::from_gram_prices(
            gram_price_from_troy_ounce(gold_per_ounce_inr),
            gram_price_from_troy_ounce(silver_per_ounce_inr),
            timestamp,
            source,
        ))
    }
}

impl MetalsDevResponse {
    /// Normalize a Metals.dev response — already INR per gram, so only the
    /// rounding policy applies.
    pub fn into_record(
        self,
        timestamp: DateTime<Utc>,
        source: &str,
    ) -> Result<RateRecord, Unavailable> {
        if !self.success {
            return Err(Unavailable::Schema("success flag false".to_string()));
        }
        let metals = self
            .metals
            .ok_or_else(|| Unavailable::Schema("missing metals object".to_string()))?;

        Ok(RateRecord::from_gram_prices(
            metals.gold,
            metals.silver,
            timestamp,
            source,
        ))
    }
}
