//! Price providers — the `FetchRates` capability and its adapters.

pub mod metalprice;
pub mod metalsdev;

use crate::clock::Clock;
use crate::domain::rates::RateRecord;
use crate::error::Unavailable;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub use metalprice::MetalpriceApi;
pub use metalsdev::MetalsDev;

/// Capability implemented by every price provider adapter.
#[async_trait]
pub trait FetchRates: Send + Sync {
    /// Identifier stamped into `RateRecord::source`.
    fn name(&self) -> &'static str;

    /// Produce a canonical record, or signal unavailability.
    ///
    /// Hard contract: every failure — missing credential, transport error,
    /// malformed response — is absorbed into [`Unavailable`]. The fallback
    /// chain never observes any other error from an adapter.
    async fn fetch(&self) -> Result<RateRecord, Unavailable>;
}

/// Default provider chain in priority order, credentials from the
/// environment (`METALPRICE_API_KEY`, `METALSDEV_API_KEY`).
pub fn default_providers(clock: Arc<dyn Clock>, timeout: Duration) -> Vec<Box<dyn FetchRates>> {
    vec![
        Box::new(
            MetalpriceApi::from_env()
                .with_clock(clock.clone())
                .with_timeout(timeout),
        ),
        Box::new(
            MetalsDev::from_env()
                .with_clock(clock)
                .with_timeout(timeout),
        ),
    ]
}
