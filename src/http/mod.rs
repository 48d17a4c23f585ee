//! Minimal HTTP layer for provider adapters.
//!
//! One GET per call with an explicit timeout, status mapped to `HttpError`.
//! No retries: an unavailable provider is skipped and the next one tried, so
//! retrying inside the transport would only delay the fallback.

use crate::error::HttpError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout for provider calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(HttpError::ServerError {
            status: status.as_u16(),
            body,
        })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
