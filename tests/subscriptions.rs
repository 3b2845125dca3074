//! Integration tests for the SQLite subscription store.
//!
//! Each test creates its own in-memory database for isolation; the
//! persistence tests use a temp directory so the store can be reopened.

use pretty_assertions::assert_eq;

use feedcast::store::{Database, StoreError, SubscriptionStore};

async fn test_db() -> Database {
    Database::open(":memory:").await.unwrap()
}

// ============================================================================
// Subscribe / Unsubscribe
// ============================================================================

#[tokio::test]
async fn test_subscribe_appears_in_list() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();

    let urls = db.list_subscriptions("room1").await.unwrap();
    assert_eq!(urls, vec!["https://a/feed".to_string()]);
}

#[tokio::test]
async fn test_subscribe_twice_is_idempotent() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.add_subscription("room1", "https://a/feed").await.unwrap();

    let urls = db.list_subscriptions("room1").await.unwrap();
    assert_eq!(urls.len(), 1);

    let all = db.all_subscriptions().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_two_subscribers_share_one_feed() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.add_subscription("room2", "https://a/feed").await.unwrap();

    let all = db.all_subscriptions().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|s| s.url == "https://a/feed"));

    let mut subscribers: Vec<&str> = all.iter().map(|s| s.subscriber.as_str()).collect();
    subscribers.sort_unstable();
    assert_eq!(subscribers, vec!["room1", "room2"]);
}

#[tokio::test]
async fn test_unsubscribe_removes_pair_only() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.add_subscription("room2", "https://a/feed").await.unwrap();

    db.remove_subscription("room1", "https://a/feed").await.unwrap();

    assert!(db.list_subscriptions("room1").await.unwrap().is_empty());
    assert_eq!(db.list_subscriptions("room2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unsubscribe_unknown_feed_is_noop() {
    let db = test_db().await;
    db.remove_subscription("room1", "https://never/seen")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unsubscribe_twice_is_noop() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.remove_subscription("room1", "https://a/feed").await.unwrap();
    db.remove_subscription("room1", "https://a/feed").await.unwrap();
}

// ============================================================================
// Known entries
// ============================================================================

#[tokio::test]
async fn test_known_entries_starts_empty() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();

    let known = db.known_entries("https://a/feed").await.unwrap();
    assert!(known.is_empty());
}

#[tokio::test]
async fn test_known_entries_unknown_feed_errors() {
    let db = test_db().await;

    let err = db.known_entries("https://never/seen").await.unwrap_err();
    assert!(matches!(err, StoreError::FeedNotFound(_)));
}

#[tokio::test]
async fn test_recorded_entries_are_known() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.record_entries("https://a/feed", &["e1".to_string(), "e2".to_string()])
        .await
        .unwrap();

    let known = db.known_entries("https://a/feed").await.unwrap();
    assert!(known.contains("e1"));
    assert!(known.contains("e2"));
    assert_eq!(known.len(), 2);
}

#[tokio::test]
async fn test_record_overlapping_ids_is_not_an_error() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.record_entries("https://a/feed", &["e1".to_string()])
        .await
        .unwrap();
    db.record_entries("https://a/feed", &["e1".to_string(), "e2".to_string()])
        .await
        .unwrap();

    let known = db.known_entries("https://a/feed").await.unwrap();
    assert_eq!(known.len(), 2);
}

#[tokio::test]
async fn test_entry_history_survives_last_unsubscribe() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.record_entries("https://a/feed", &["e1".to_string()])
        .await
        .unwrap();
    db.remove_subscription("room1", "https://a/feed").await.unwrap();

    // Feed row and its history stay; only the subscription is gone.
    let known = db.known_entries("https://a/feed").await.unwrap();
    assert!(known.contains("e1"));
    assert!(db.all_subscriptions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_entries_are_scoped_per_feed() {
    let db = test_db().await;

    db.add_subscription("room1", "https://a/feed").await.unwrap();
    db.add_subscription("room1", "https://b/feed").await.unwrap();
    db.record_entries("https://a/feed", &["e1".to_string()])
        .await
        .unwrap();

    assert!(db.known_entries("https://b/feed").await.unwrap().is_empty());
}

// ============================================================================
// Persistence across reopen
// ============================================================================

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rss.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::open(path).await.unwrap();
        db.add_subscription("room1", "https://a/feed").await.unwrap();
        db.record_entries("https://a/feed", &["e1".to_string()])
            .await
            .unwrap();
    }

    let db = Database::open(path).await.unwrap();
    let urls = db.list_subscriptions("room1").await.unwrap();
    assert_eq!(urls, vec!["https://a/feed".to_string()]);

    let known = db.known_entries("https://a/feed").await.unwrap();
    assert!(known.contains("e1"));
}

#[tokio::test]
async fn test_reopen_migration_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rss.db");
    let path = path.to_str().unwrap();

    Database::open(path).await.unwrap();
    Database::open(path).await.unwrap();
}
