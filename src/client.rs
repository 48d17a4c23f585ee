//! High-level client — `RateTracker` with acquisition, persistence, and cadence.
//!
//! This module keeps the builder, the fallback chain, and the refresh guard.
//! Domain logic lives in `domain/`; providers in `provider/`.

use crate::clock::{Clock, SystemClock};
use crate::domain::change::ChangeReport;
use crate::domain::history::{FileStore, HistoryEntry, HistoryStore, KvStore};
use crate::domain::rates::{RateRecord, SOURCE_FALLBACK_CACHE};
use crate::error::TrackerError;
use crate::http::DEFAULT_TIMEOUT;
use crate::provider::{default_providers, FetchRates};
use crate::shared::local_offset;
use async_lock::Mutex;
use chrono::{DateTime, FixedOffset, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Auto-refresh cadence: refresh once the marker is older than this (1 hour).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// Default path of the file-backed store.
pub const DEFAULT_STORE_PATH: &str = "metal_rates.json";

/// Result of one acquisition cycle.
///
/// `used_fallback` tells the presentation layer whether to surface a
/// "cached/approximate data" notice or clear it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub record: RateRecord,
    pub used_fallback: bool,
}

/// The primary entry point: fetch-with-fallback, history upkeep, deltas.
pub struct RateTracker {
    providers: Vec<Box<dyn FetchRates>>,
    store: HistoryStore,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    /// Serializes refresh cycles; a second refresh issued while one holds
    /// this guard is dropped, not queued.
    refresh_guard: Mutex<()>,
}

impl RateTracker {
    pub fn builder() -> RateTrackerBuilder {
        RateTrackerBuilder::default()
    }

    /// Acquire the current rates. Total — never fails.
    ///
    /// Providers are tried strictly sequentially in priority order; the
    /// first success is returned untouched. When every adapter is
    /// unavailable, the newest history entry is replayed, or the hardcoded
    /// approximate record if the history is empty.
    pub async fn acquire(&self) -> Acquisition {
        for provider in &self.providers {
            match provider.fetch().await {
                Ok(record) => {
                    debug!(provider = provider.name(), "live rates acquired");
                    return Acquisition {
                        record,
                        used_fallback: false,
                    };
                }
                Err(reason) => {
                    warn!(provider = provider.name(), %reason, "provider unavailable");
                }
            }
        }

        match self.store.latest() {
            Some(entry) => {
                info!("all providers unavailable, replaying newest history entry");
                // Prices are replayed but the acquisition instant is now, so
                // the upsert lands on today's calendar day.
                let mut record = entry.to_record(SOURCE_FALLBACK_CACHE);
                record.timestamp = self.clock.now();
                Acquisition {
                    record,
                    used_fallback: true,
                }
            }
            None => {
                info!("all providers unavailable and history empty, using approximate defaults");
                Acquisition {
                    record: RateRecord::fallback_default(self.clock.now()),
                    used_fallback: true,
                }
            }
        }
    }

    /// One guarded acquisition-then-upsert cycle.
    ///
    /// Returns `None` when another refresh is already in flight (the
    /// overlapping invocation is dropped so timer and manual refreshes can't
    /// race on the same day's entry). The last-update marker is written only
    /// after the cycle completes.
    pub async fn refresh(&self) -> Result<Option<Acquisition>, TrackerError> {
        let Some(_guard) = self.refresh_guard.try_lock() else {
            debug!("refresh already in flight, skipping");
            return Ok(None);
        };

        let acquisition = self.acquire().await;
        self.store.upsert(&acquisition.record)?;
        self.store.mark_updated(self.clock.now())?;
        Ok(Some(acquisition))
    }

    /// Refresh only when the last-update marker is stale.
    pub async fn refresh_if_stale(&self) -> Result<Option<Acquisition>, TrackerError> {
        if self.needs_refresh() {
            self.refresh().await
        } else {
            debug!("rates still fresh, skipping refresh");
            Ok(None)
        }
    }

    /// Whether the last completed refresh is older than the refresh
    /// interval (or has never happened).
    pub fn needs_refresh(&self) -> bool {
        match self.store.last_update() {
            None => true,
            Some(at) => {
                let max_age = chrono::Duration::from_std(self.refresh_interval)
                    .unwrap_or(chrono::Duration::MAX);
                self.clock.now() - at > max_age
            }
        }
    }

    /// Repeating timer loop: every refresh interval, refresh if stale.
    ///
    /// Never returns — run it on its own task. Failed cycles are logged and
    /// the loop continues.
    pub async fn run_auto_refresh(&self) {
        loop {
            futures_timer::Delay::new(self.refresh_interval).await;
            if let Err(e) = self.refresh_if_stale().await {
                warn!(error = %e, "scheduled refresh failed");
            }
        }
    }

    /// Persisted history, oldest first. Corrupt data reads as empty.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.all()
    }

    /// Day-over-day deltas from the two newest history entries; `None` until
    /// the history has at least two days.
    pub fn change(&self) -> Option<ChangeReport> {
        ChangeReport::from_history(&self.store.all())
    }

    /// Bootstrap synthetic history when empty; see
    /// [`HistoryStore::seed_if_empty`].
    pub fn seed_if_empty(&self) -> Result<bool, TrackerError> {
        Ok(self.store.seed_if_empty(self.clock.now())?)
    }

    /// Instant of the last completed refresh, if any.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.store.last_update()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct RateTrackerBuilder {
    providers: Vec<Box<dyn FetchRates>>,
    kv: Option<Box<dyn KvStore>>,
    store_path: PathBuf,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
    refresh_interval: Duration,
    provider_timeout: Duration,
}

impl Default for RateTrackerBuilder {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            kv: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            clock: Arc::new(SystemClock),
            offset: local_offset(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            provider_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RateTrackerBuilder {
    /// Append a provider; order of calls is priority order.
    pub fn provider(mut self, provider: Box<dyn FetchRates>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Use a custom backing store instead of the default file store.
    pub fn store(mut self, kv: Box<dyn KvStore>) -> Self {
        self.kv = Some(kv);
        self
    }

    /// Path of the default file store (ignored when [`Self::store`] is set).
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Inject a clock (tests use [`crate::clock::ManualClock`]).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Local UTC offset used for calendar-day keying. Defaults to the
    /// system offset.
    pub fn offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Per-request timeout applied to the default providers.
    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn build(self) -> RateTracker {
        let providers = if self.providers.is_empty() {
            default_providers(self.clock.clone(), self.provider_timeout)
        } else {
            self.providers
        };
        let kv = self
            .kv
            .unwrap_or_else(|| Box::new(FileStore::new(self.store_path)));

        RateTracker {
            providers,
            store: HistoryStore::new(kv, self.offset),
            clock: self.clock,
            refresh_interval: self.refresh_interval,
            refresh_guard: Mutex::new(()),
        }
    }
}
