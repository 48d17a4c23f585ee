//! # metalrates-sdk
//!
//! A Rust SDK for tracking daily gold and silver rates (INR per gram).
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared conversion math, domain models, error types
//! 2. **Providers** — `FetchRates` adapters over external price APIs
//! 3. **Persistence** — Capped date-keyed history over a key-value store
//! 4. **High-Level Client** — `RateTracker` with fallback chain and cadence
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use metalrates_sdk::prelude::*;
//!
//! let tracker = RateTracker::builder()
//!     .store_path("metal_rates.json")
//!     .build();
//!
//! tracker.seed_if_empty()?;
//! let acquisition = tracker.refresh_if_stale().await?;
//! let history = tracker.history();
//! let change = tracker.change();
//! ```
//!
//! Acquisition is total: when every provider is unavailable the tracker
//! replays the newest history entry, or a hardcoded approximate record, and
//! flags the result so a UI can surface a notice.

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared constants and pure conversion helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Provider endpoint constants.
pub mod network;

/// Injectable clock.
pub mod clock;

// ── Layer 2: Providers ───────────────────────────────────────────────────────

/// HTTP helper with explicit per-request timeout.
pub mod http;

/// The `FetchRates` capability and its adapters.
pub mod provider;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `RateTracker` — the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Domain types — rates
    pub use crate::domain::rates::{
        RateRecord, SOURCE_FALLBACK_CACHE, SOURCE_FALLBACK_DEFAULT,
    };

    // Domain types — history
    pub use crate::domain::history::{
        FileStore, HistoryEntry, HistoryLog, HistoryStore, KvStore, MemoryStore, HISTORY_CAP,
    };

    // Domain types — change
    pub use crate::domain::change::{ChangeReport, Direction, FieldChange};

    // Errors
    pub use crate::error::{StoreError, TrackerError, Unavailable};

    // Clock
    pub use crate::clock::{Clock, ManualClock, SystemClock};

    // Providers
    pub use crate::provider::{FetchRates, MetalpriceApi, MetalsDev};

    // High-level client
    pub use crate::client::{
        Acquisition, RateTracker, RateTrackerBuilder, DEFAULT_REFRESH_INTERVAL,
    };
}
