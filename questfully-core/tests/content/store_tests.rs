// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for ContentStore
//!
//! - Cached content is served on cold start
//! - Refresh publishes categories before question buckets
//! - Fetch failures keep previously published state
//! - Overlapping refreshes share one cycle

use std::fs;
use std::sync::Arc;

use parking_lot::Mutex;
use questfully_core::{
    ApiConfig, CallbackHandler, ContentCache, ContentEvent, ContentStore, QuestionBuckets,
    RefreshTarget,
};
use tempfile::TempDir;

use crate::common::{category, question, stats, MockContentSource};

fn test_config(temp: &TempDir) -> ApiConfig {
    ApiConfig::default().with_storage_path(temp.path())
}

fn seeded_source() -> MockContentSource {
    let source = MockContentSource::new();
    source.set_categories(Some(vec![category("c1"), category("c2")]));
    source.set_questions("c1", Some(vec![question("q1", "c1"), question("q2", "c1")]));
    source.set_questions("c2", Some(vec![question("q3", "c2")]));
    source.set_stats(Some(stats(3, &[("c1", 2), ("c2", 1)])));
    source
}

#[test]
fn test_store_serves_cached_snapshot_on_cold_start() {
    let temp = TempDir::new().unwrap();
    {
        let cache = ContentCache::new(temp.path()).unwrap();
        cache.save_categories(&[category("cached")]);
        cache.save_stats(&stats(4, &[("cached", 4)]));
    }

    let store = ContentStore::new(&test_config(&temp), MockContentSource::new()).unwrap();

    assert_eq!(store.categories(), vec![category("cached")]);
    assert_eq!(store.stats().unwrap().total_questions, 4);
    assert_eq!(store.source().calls(), (0, 0, 0));
}

#[tokio::test]
async fn test_refresh_publishes_categories_in_server_order() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    source.set_categories(Some(vec![category("c2"), category("c1")]));
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    let report = store.refresh_content().await;

    assert!(report.is_complete());
    assert!(report.categories_updated);
    assert_eq!(store.categories(), vec![category("c2"), category("c1")]);
    assert_eq!(store.questions_for("c1").len(), 2);
    assert_eq!(store.questions_for("c2").len(), 1);
    assert_eq!(store.stats(), Some(stats(3, &[("c1", 2), ("c2", 1)])));
}

#[tokio::test]
async fn test_refresh_normalizes_question_category() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    source.set_questions("c2", Some(vec![question("q9", "somewhere-else")]));
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    store.refresh_content().await;

    let bucket = store.questions_for("c2");
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].id, "q9");
    assert_eq!(bucket[0].category_id, "c2");
}

#[tokio::test]
async fn test_buckets_seeded_before_questions_arrive() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    let gate = source.gate_questions();
    let store = Arc::new(ContentStore::new(&test_config(&temp), source).unwrap());
    let mut updates = store.subscribe();

    let refreshing = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh_content().await })
    };

    // Wait for the categories publication; question fetches are still held.
    loop {
        updates.changed().await.unwrap();
        if !updates.borrow().categories.is_empty() {
            break;
        }
    }
    {
        let snapshot = updates.borrow();
        assert_eq!(snapshot.categories, vec![category("c1"), category("c2")]);
        assert_eq!(snapshot.questions.get("c1"), Some(&Vec::new()));
        assert_eq!(snapshot.questions.get("c2"), Some(&Vec::new()));
    }

    gate.add_permits(2);
    let report = refreshing.await.unwrap();

    assert!(report.is_complete());
    assert_eq!(store.questions_for("c1").len(), 2);
}

#[tokio::test]
async fn test_stats_failure_keeps_previous_stats() {
    let temp = TempDir::new().unwrap();
    {
        let cache = ContentCache::new(temp.path()).unwrap();
        cache.save_stats(&stats(99, &[]));
    }
    let source = seeded_source();
    source.set_stats(None);
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    let report = store.refresh_content().await;

    assert!(!report.stats_updated);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, RefreshTarget::Stats);
    assert_eq!(store.categories(), vec![category("c1"), category("c2")]);
    assert_eq!(store.questions_for("c2"), vec![question("q3", "c2")]);
    assert_eq!(store.stats(), Some(stats(99, &[])));
}

#[tokio::test]
async fn test_stats_failure_without_previous_stats_stays_absent() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    source.set_stats(None);
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    store.refresh_content().await;

    assert!(store.stats().is_none());
    assert_eq!(store.categories().len(), 2);
}

#[tokio::test]
async fn test_category_failure_keeps_state_and_skips_questions() {
    let temp = TempDir::new().unwrap();
    {
        let cache = ContentCache::new(temp.path()).unwrap();
        cache.save_categories(&[category("old")]);
    }
    let source = seeded_source();
    source.set_categories(None);
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    let report = store.refresh_content().await;

    assert!(!report.categories_updated);
    assert!(report.stats_updated);
    assert_eq!(store.categories(), vec![category("old")]);
    let (category_calls, question_calls, _) = store.source().calls();
    assert_eq!((category_calls, question_calls), (1, 0));

    store.cache().flush();
    let cache = ContentCache::new(temp.path()).unwrap();
    assert_eq!(cache.load_categories(), vec![category("old")]);
}

#[tokio::test]
async fn test_one_bucket_failure_keeps_that_bucket() {
    let temp = TempDir::new().unwrap();
    {
        let cache = ContentCache::new(temp.path()).unwrap();
        let mut buckets = QuestionBuckets::new();
        buckets.insert("c1".into(), vec![question("old", "c1")]);
        cache.save_questions(&buckets);
    }
    let source = seeded_source();
    source.set_questions("c1", None);
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    let report = store.refresh_content().await;

    assert_eq!(report.buckets_updated, vec!["c2".to_string()]);
    assert_eq!(
        report.failed[0].0,
        RefreshTarget::Questions {
            category_id: "c1".into()
        }
    );
    assert_eq!(store.questions_for("c1"), vec![question("old", "c1")]);
    assert_eq!(store.questions_for("c2"), vec![question("q3", "c2")]);
}

#[tokio::test]
async fn test_refresh_persists_to_cache() {
    let temp = TempDir::new().unwrap();
    let store = ContentStore::new(&test_config(&temp), seeded_source()).unwrap();

    store.refresh_content().await;
    drop(store);

    let reopened = ContentStore::new(&test_config(&temp), MockContentSource::new()).unwrap();
    assert_eq!(reopened.categories(), vec![category("c1"), category("c2")]);
    assert_eq!(reopened.questions_for("c1").len(), 2);
    assert_eq!(reopened.stats().unwrap().total_questions, 3);
}

#[tokio::test]
async fn test_corrupt_question_cache_recovers_on_refresh() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("content")).unwrap();
    fs::write(temp.path().join("content/questions.json"), "garbage").unwrap();

    let store = ContentStore::new(&test_config(&temp), seeded_source()).unwrap();
    assert!(store.snapshot().questions.is_empty());

    let report = store.refresh_content().await;

    assert!(report.is_complete());
    assert_eq!(store.questions_for("c1").len(), 2);
}

#[tokio::test]
async fn test_overlapping_refresh_joins_in_flight_cycle() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    let gate = source.gate_questions();
    let store = Arc::new(ContentStore::new(&test_config(&temp), source).unwrap());
    let mut updates = store.subscribe();

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh_content().await })
    };
    updates.changed().await.unwrap();

    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh_content().await })
    };
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    gate.add_permits(2);
    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert!(!first.joined);
    assert!(second.joined);
    assert_eq!(second.buckets_updated, first.buckets_updated);
    assert_eq!(store.source().calls(), (1, 2, 1));
}

#[tokio::test]
async fn test_joined_refresh_runs_again_when_cycle_is_abandoned() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    let gate = source.gate_questions();
    let store = Arc::new(ContentStore::new(&test_config(&temp), source).unwrap());
    let mut updates = store.subscribe();

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh_content().await })
    };
    updates.changed().await.unwrap();

    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.refresh_content().await })
    };
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }

    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());

    gate.add_permits(2);
    let second = second.await.unwrap();

    assert!(!second.joined);
    assert!(second.categories_updated);
    assert!(second.is_complete());
    assert_eq!(second.buckets_updated.len(), 2);
    assert_eq!(store.source().calls().0, 2);
    assert_eq!(store.questions_for("c1").len(), 2);
}

#[tokio::test]
async fn test_failed_fetches_leave_cached_documents_untouched() {
    let temp = TempDir::new().unwrap();
    let mut cached_buckets = QuestionBuckets::new();
    cached_buckets.insert("c1".into(), vec![question("old", "c1")]);
    let cached_stats = stats(7, &[("c1", 7)]);
    {
        let cache = ContentCache::new(temp.path()).unwrap();
        cache.save_questions(&cached_buckets);
        cache.save_stats(&cached_stats);
    }
    let source = seeded_source();
    source.set_questions("c1", None);
    source.set_questions("c2", None);
    source.set_stats(None);
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    let report = store.refresh_content().await;
    store.cache().flush();

    assert!(report.categories_updated);
    assert!(report.buckets_updated.is_empty());
    assert_eq!(report.failed.len(), 3);
    let cache = ContentCache::new(temp.path()).unwrap();
    assert_eq!(cache.load_questions(), cached_buckets);
    assert_eq!(cache.load_stats(), Some(cached_stats));
    assert_eq!(cache.load_categories(), vec![category("c1"), category("c2")]);
}

#[tokio::test]
async fn test_handler_can_register_handlers_while_dispatching() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(ContentStore::new(&test_config(&temp), seeded_source()).unwrap());

    let late_events = Arc::new(Mutex::new(Vec::new()));
    let weak = Arc::downgrade(&store);
    let sink = late_events.clone();
    store.add_handler(Arc::new(CallbackHandler::new(move |e| {
        if let (ContentEvent::CategoriesUpdated { .. }, Some(store)) = (e, weak.upgrade()) {
            let sink = sink.clone();
            store.add_handler(Arc::new(CallbackHandler::new(move |e| sink.lock().push(e))));
        }
    })));

    let report = store.refresh_content().await;

    assert!(report.is_complete());
    assert!(late_events
        .lock()
        .iter()
        .any(|e| matches!(e, ContentEvent::QuestionsUpdated { .. })));
}

#[tokio::test]
async fn test_sequential_refreshes_each_run() {
    let temp = TempDir::new().unwrap();
    let store = ContentStore::new(&test_config(&temp), seeded_source()).unwrap();

    store.refresh_content().await;
    let report = store.refresh_content().await;

    assert!(!report.joined);
    assert_eq!(store.source().calls().0, 2);
}

#[tokio::test]
async fn test_failures_reach_event_handlers() {
    let temp = TempDir::new().unwrap();
    let source = seeded_source();
    source.set_stats(None);
    let store = ContentStore::new(&test_config(&temp), source).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    store.add_handler(Arc::new(CallbackHandler::new(move |e| sink.lock().push(e))));

    store.refresh_content().await;

    let events = events.lock();
    assert!(events.contains(&ContentEvent::CategoriesUpdated { count: 2 }));
    assert!(events.iter().any(|e| matches!(
        e,
        ContentEvent::FetchFailed {
            target: RefreshTarget::Stats,
            ..
        }
    )));
}

#[tokio::test]
async fn test_disabled_remote_sync_fetches_nothing() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp).without_remote_sync();
    let store = ContentStore::new(&config, seeded_source()).unwrap();

    let report = store.refresh_content().await;

    assert!(!report.is_complete());
    assert_eq!(store.source().calls(), (0, 0, 0));
    assert!(store.categories().is_empty());
}
