//! MetalpriceAPI adapter — USD-base inverse quotes, converted to INR per gram.

use super::FetchRates;
use crate::clock::{Clock, SystemClock};
use crate::domain::rates::wire::MetalpriceResponse;
use crate::domain::rates::RateRecord;
use crate::error::Unavailable;
use crate::http::HttpClient;
use crate::network::{METALPRICE_API_URL, METALPRICE_KEY_ENV};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Source identifier for this provider.
pub const NAME: &str = "metalpriceapi";

/// Adapter for <https://metalpriceapi.com/>.
pub struct MetalpriceApi {
    api_key: Option<String>,
    endpoint: String,
    http: HttpClient,
    clock: Arc<dyn Clock>,
}

impl MetalpriceApi {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            endpoint: METALPRICE_API_URL.to_string(),
            http: HttpClient::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Read the API key from `METALPRICE_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(std::env::var(METALPRICE_KEY_ENV).ok())
    }

    /// Override the endpoint (tests point this at a local server).
    pub fn with_endpoint(mut self, url: &str) -> Self {
        self.endpoint = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = HttpClient::new(timeout);
        self
    }
}

#[async_trait]
impl FetchRates for MetalpriceApi {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self) -> Result<RateRecord, Unavailable> {
        // Fast-fail: no credential, no network call.
        let Some(key) = self.api_key.as_deref() else {
            debug!(provider = NAME, "API key not configured, skipping");
            return Err(Unavailable::CredentialMissing);
        };

        let url = format!(
            "{}?api_key={}&base=USD&currencies=XAU,XAG,INR",
            self.endpoint, key
        );
        let resp: MetalpriceResponse = self.http.get_json(&url).await.map_err(Unavailable::from)?;
        resp.into_record(self.clock.now(), NAME)
    }
}
