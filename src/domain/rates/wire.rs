//! Wire types for provider responses (REST).

use serde::{Deserialize, Serialize};

// ─── MetalpriceAPI ───────────────────────────────────────────────────────────

/// Raw MetalpriceAPI latest-rates response.
///
/// Rates are quoted against a USD base: `XAU`/`XAG` are troy ounces of metal
/// per USD (an inverse price), `INR` is rupees per USD.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetalpriceResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates: Option<MetalpriceRates>,
}

/// The `rates` object of a MetalpriceAPI response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetalpriceRates {
    #[serde(rename = "XAU")]
    pub xau: f64,
    #[serde(rename = "XAG")]
    pub xag: f64,
    #[serde(rename = "INR")]
    pub inr: f64,
}

// ─── Metals.dev ──────────────────────────────────────────────────────────────

/// Raw Metals.dev latest-rates response, already quoted in the requested
/// currency per gram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetalsDevResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metals: Option<MetalsDevMetals>,
}

/// The `metals` object of a Metals.dev response.
///
/// Individual metals may be absent; a missing metal is priced at 0 rather
/// than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetalsDevMetals {
    #[serde(default)]
    pub gold: f64,
    #[serde(default)]
    pub silver: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metalprice_response_parses() {
        let json = r#"{"success":true,"rates":{"XAU":0.00038,"XAG":0.032,"INR":83.2}}"#;
        let resp: MetalpriceResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        let rates = resp.rates.unwrap();
        assert_eq!(rates.xau, 0.00038);
        assert_eq!(rates.inr, 83.2);
    }

    #[test]
    fn test_metalprice_response_without_rates() {
        let json = r#"{"success":false}"#;
        let resp: MetalpriceResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert!(resp.rates.is_none());
    }

    #[test]
    fn test_metalsdev_missing_metal_defaults_to_zero() {
        let json = r#"{"success":true,"metals":{"gold":6850.4}}"#;
        let resp: MetalsDevResponse = serde_json::from_str(json).unwrap();
        let metals = resp.metals.unwrap();
        assert_eq!(metals.gold, 6850.4);
        assert_eq!(metals.silver, 0.0);
    }
}
