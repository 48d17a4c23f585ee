//! Provider endpoint constants.

/// MetalpriceAPI latest-rates endpoint (USD base, XAU/XAG/INR quotes).
pub const METALPRICE_API_URL: &str = "https://api.metalpriceapi.com/v1/latest";

/// Metals.dev latest-rates endpoint (INR per gram).
pub const METALSDEV_API_URL: &str = "https://api.metals.dev/v1/latest";

/// Environment variable holding the MetalpriceAPI key.
pub const METALPRICE_KEY_ENV: &str = "METALPRICE_API_KEY";

/// Environment variable holding the Metals.dev key.
pub const METALSDEV_KEY_ENV: &str = "METALSDEV_API_KEY";
