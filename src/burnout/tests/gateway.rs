use std::sync::Arc;

use super::common::*;
use crate::burnout::domain::SyncStatus;
use crate::burnout::gateway::{DataSource, PersistenceGateway};
use crate::burnout::store::{AssessmentStore, MemoryStore};
use chrono::{Duration, NaiveDate};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date") + Duration::days(offset)
}

#[tokio::test]
async fn guest_saves_are_local_only() {
    let store = Arc::new(MemoryStore::default());
    let (_dir, cache) = temp_cache();
    let gateway = PersistenceGateway::new(Arc::clone(&store), cache);

    let assessment = assessment_on(day(0), uniform_answers(2));
    let sync = gateway
        .save(None, &assessment, day(0))
        .await
        .expect("guest save succeeds");

    assert_eq!(sync, SyncStatus::LocalOnly);
    assert!(store.is_empty());
}

#[tokio::test]
async fn remote_failure_downgrades_to_pending() {
    let (_dir, cache) = temp_cache();
    let gateway = PersistenceGateway::new(Arc::new(UnavailableStore), cache);
    let maya = user("maya");

    let assessment = assessment_on(day(0), uniform_answers(3));
    let sync = gateway
        .save(Some(&maya), &assessment, day(0))
        .await
        .expect("save degrades instead of failing");

    assert_eq!(sync, SyncStatus::Pending);

    // The cached copy still serves reads.
    let snapshot = gateway
        .history(Some(&maya), day(0))
        .await
        .expect("degraded history");
    assert_eq!(snapshot.source, DataSource::LocalCache);
    assert!(snapshot.degraded);
    assert_eq!(snapshot.assessments, vec![assessment]);
}

#[tokio::test]
async fn successful_save_reports_synced() {
    let store = Arc::new(MemoryStore::default());
    let (_dir, cache) = temp_cache();
    let gateway = PersistenceGateway::new(Arc::clone(&store), cache);
    let maya = user("maya");

    let assessment = assessment_on(day(0), uniform_answers(3));
    let sync = gateway
        .save(Some(&maya), &assessment, day(0))
        .await
        .expect("save succeeds");

    assert_eq!(sync, SyncStatus::Synced);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn duplicate_day_saves_keep_one_row_with_last_write() {
    let store = Arc::new(MemoryStore::default());
    let (_dir, cache) = temp_cache();
    let gateway = PersistenceGateway::new(Arc::clone(&store), cache);
    let maya = user("maya");

    let first = assessment_on(day(0), uniform_answers(1));
    let second = assessment_on(day(0), uniform_answers(4));
    gateway
        .save(Some(&maya), &first, day(0))
        .await
        .expect("first save");
    gateway
        .save(Some(&maya), &second, day(0))
        .await
        .expect("second save");

    assert_eq!(store.len(), 1);
    let rows = store
        .fetch_since(&maya, day(0))
        .await
        .expect("fetch succeeds");
    assert_eq!(rows, vec![second]);
}

#[tokio::test]
async fn first_remote_write_migrates_local_history() {
    let maya = user("maya");
    let dir = tempfile::TempDir::new().expect("temp dir");
    let cache_path = dir.path().join("cache.csv");

    // Two check-ins recorded while the store was unreachable.
    let offline_a = assessment_on(day(0), uniform_answers(2));
    let offline_b = assessment_on(day(1), uniform_answers(3));
    {
        let cache = crate::burnout::cache::LocalCache::new(cache_path.clone(), 30);
        let gateway = PersistenceGateway::new(Arc::new(UnavailableStore), cache);
        gateway
            .save(Some(&maya), &offline_a, day(1))
            .await
            .expect("offline save");
        gateway
            .save(Some(&maya), &offline_b, day(1))
            .await
            .expect("offline save");
    }

    // Same cache file, store back online. A conflicting remote row for day 1
    // must win over the cached copy.
    let cache = crate::burnout::cache::LocalCache::new(cache_path, 30);
    let store = Arc::new(MemoryStore::default());
    let remote_b = assessment_on(day(1), uniform_answers(5));
    store.upsert(&maya, &remote_b).await.expect("remote seed");

    let gateway = PersistenceGateway::new(Arc::clone(&store), cache);
    let today_row = assessment_on(day(2), uniform_answers(2));
    let sync = gateway
        .save(Some(&maya), &today_row, day(2))
        .await
        .expect("online save");
    assert_eq!(sync, SyncStatus::Synced);

    let rows = store
        .fetch_since(&maya, day(0))
        .await
        .expect("fetch succeeds");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], offline_a);
    // Migration skipped the row the remote already held.
    assert_eq!(rows[1], remote_b);
    assert_eq!(rows[2], today_row);
}

#[tokio::test]
async fn history_prefers_remote_when_available() {
    let store = Arc::new(MemoryStore::default());
    let maya = user("maya");
    let remote_row = assessment_on(day(0), uniform_answers(3));
    store.upsert(&maya, &remote_row).await.expect("seed");

    let (_dir, cache) = temp_cache();
    let gateway = PersistenceGateway::new(store, cache);

    let snapshot = gateway
        .history(Some(&maya), day(0))
        .await
        .expect("history succeeds");
    assert_eq!(snapshot.source, DataSource::Remote);
    assert!(!snapshot.degraded);
    assert_eq!(snapshot.assessments, vec![remote_row]);
}

#[tokio::test]
async fn empty_history_is_a_result_not_an_error() {
    let (_dir, cache) = temp_cache();
    let gateway = PersistenceGateway::new(Arc::new(UnavailableStore), cache);
    let maya = user("maya");

    let snapshot = gateway
        .history(Some(&maya), day(0))
        .await
        .expect("no-data history succeeds");
    assert!(snapshot.assessments.is_empty());
    assert!(snapshot.degraded);
}
