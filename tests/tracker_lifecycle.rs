//! End-to-end tracker lifecycle over a file-backed store.
//!
//! Exercises the public surface the way an embedding app would: seed,
//! refresh, read history and deltas, survive a provider outage, and reopen
//! the store from disk.

use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone, Utc};
use metalrates_sdk::prelude::*;
use std::sync::Arc;
use std::time::Duration;

struct ScriptedProvider {
    gold_per_gram: f64,
    clock: Arc<ManualClock>,
}

#[async_trait]
impl FetchRates for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch(&self) -> Result<RateRecord, Unavailable> {
        Ok(RateRecord::from_gram_prices(
            self.gold_per_gram,
            85.0,
            self.clock.now(),
            self.name(),
        ))
    }
}

struct OutageProvider;

#[async_trait]
impl FetchRates for OutageProvider {
    fn name(&self) -> &'static str {
        "outage"
    }

    async fn fetch(&self) -> Result<RateRecord, Unavailable> {
        Err(Unavailable::Transport("503".to_string()))
    }
}

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ))
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

#[tokio::test]
async fn full_lifecycle_against_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    let clock = start_clock();

    let tracker = RateTracker::builder()
        .provider(Box::new(ScriptedProvider {
            gold_per_gram: 6800.0,
            clock: clock.clone(),
        }))
        .store_path(&path)
        .clock(clock.clone())
        .offset(utc())
        .refresh_interval(Duration::from_secs(3600))
        .build();

    // Fresh store: nothing persisted, change unavailable.
    assert!(tracker.history().is_empty());
    assert!(tracker.change().is_none());
    assert!(tracker.needs_refresh());

    // First refresh persists one day and arms the cadence marker.
    let acq = tracker.refresh_if_stale().await.unwrap().unwrap();
    assert!(!acq.used_fallback);
    assert_eq!(acq.record.gold_24k, 6800);
    assert_eq!(tracker.history().len(), 1);
    assert!(!tracker.needs_refresh());
    assert!(tracker.refresh_if_stale().await.unwrap().is_none());

    // Next day: a second entry and a change report.
    clock.advance(chrono::Duration::days(1));
    drop(tracker);
    let tracker = RateTracker::builder()
        .provider(Box::new(ScriptedProvider {
            gold_per_gram: 6850.0,
            clock: clock.clone(),
        }))
        .store_path(&path)
        .clock(clock.clone())
        .offset(utc())
        .build();

    tracker.refresh().await.unwrap().unwrap();
    let history = tracker.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].gold_24k, 6800);
    assert_eq!(history[1].gold_24k, 6850);

    let change = tracker.change().unwrap();
    assert_eq!(change.gold_24k.absolute, 50);
    assert_eq!(change.gold_24k.direction, Direction::Up);
    assert_eq!((change.gold_24k.percent.unwrap() * 100.0).round() / 100.0, 0.74);

    // Day three, provider down: the newest entry is replayed and still
    // upserted under the new date.
    clock.advance(chrono::Duration::days(1));
    drop(tracker);
    let tracker = RateTracker::builder()
        .provider(Box::new(OutageProvider))
        .store_path(&path)
        .clock(clock.clone())
        .offset(utc())
        .build();

    let acq = tracker.refresh().await.unwrap().unwrap();
    assert!(acq.used_fallback);
    assert_eq!(acq.record.source, SOURCE_FALLBACK_CACHE);
    assert_eq!(acq.record.gold_24k, 6850);
    assert_eq!(tracker.history().len(), 3);
}

#[tokio::test]
async fn seeded_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rates.json");
    let clock = start_clock();

    let tracker = RateTracker::builder()
        .provider(Box::new(OutageProvider))
        .store_path(&path)
        .clock(clock.clone())
        .offset(utc())
        .build();

    assert!(tracker.seed_if_empty().unwrap());
    let seeded = tracker.history();
    assert_eq!(seeded.len(), 7);
    assert!(tracker.change().is_some());

    // Reopening the store sees the same entries, and seeding again is a
    // no-op.
    drop(tracker);
    let reopened = RateTracker::builder()
        .provider(Box::new(OutageProvider))
        .store_path(&path)
        .clock(clock)
        .offset(utc())
        .build();
    assert_eq!(reopened.history(), seeded);
    assert!(!reopened.seed_if_empty().unwrap());
}

#[tokio::test]
async fn default_record_when_offline_and_empty() {
    let clock = start_clock();
    let tracker = RateTracker::builder()
        .provider(Box::new(OutageProvider))
        .store(Box::new(MemoryStore::new()))
        .clock(clock)
        .offset(utc())
        .build();

    let acq = tracker.refresh().await.unwrap().unwrap();
    assert!(acq.used_fallback);
    assert_eq!(acq.record.source, SOURCE_FALLBACK_DEFAULT);
    assert_eq!(acq.record.gold_24k, 6850);
    assert_eq!(acq.record.gold_22k, 6275);
    assert_eq!(acq.record.silver, 85);

    // The fallback record is still persisted as today's entry.
    assert_eq!(tracker.history().len(), 1);
}
