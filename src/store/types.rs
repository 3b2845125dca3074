use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from the subscription store.
///
/// These surface to the caller only for user-triggered operations
/// (subscribe/unsubscribe/list). Inside a poll cycle they are logged and
/// contained to the feed being processed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The URL has never been subscribed to, so no feed row exists.
    #[error("Unknown feed: {0}")]
    FeedNotFound(String),

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ============================================================================
// Data Structures
// ============================================================================

/// One persisted (feed URL, subscriber) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub url: String,
    pub subscriber: String,
}

// ============================================================================
// Store Contract
// ============================================================================

/// Durable mapping between feed URLs, subscribers, and already-delivered
/// entry ids.
///
/// Two implementations satisfy this contract: [`Database`](super::Database)
/// backed by SQLite for production, and [`MemoryStore`](super::MemoryStore)
/// for tests. Every method is safe to call from the poll loop concurrently
/// with user-triggered subscribe/unsubscribe calls.
#[allow(async_fn_in_trait)]
pub trait SubscriptionStore {
    /// Ensure a feed row exists for `url` (the URL is the dedup key) and a
    /// subscription row exists for (subscriber, feed). Idempotent: calling
    /// twice with identical arguments produces identical final state.
    async fn add_subscription(&self, subscriber: &str, url: &str) -> Result<(), StoreError>;

    /// Delete the subscription row for (subscriber, feed). Unknown feeds and
    /// already-removed subscriptions are a no-op, not an error.
    async fn remove_subscription(&self, subscriber: &str, url: &str) -> Result<(), StoreError>;

    /// Feed URLs the subscriber currently follows. Order is not significant.
    async fn list_subscriptions(&self, subscriber: &str) -> Result<Vec<String>, StoreError>;

    /// Every persisted (url, subscriber) pair as one consistent snapshot.
    /// The engine's primary read for building its per-cycle fan-out map.
    async fn all_subscriptions(&self) -> Result<Vec<Subscription>, StoreError>;

    /// Entry ids already recorded as delivered for the feed at `url`.
    ///
    /// # Errors
    ///
    /// [`StoreError::FeedNotFound`] if the URL has literally never been
    /// subscribed to. The engine only calls this for feeds it read from
    /// [`all_subscriptions`](Self::all_subscriptions).
    async fn known_entries(&self, url: &str) -> Result<HashSet<String>, StoreError>;

    /// Append `ids` to the feed's known-entry set. Insert-if-absent per id:
    /// ids already present are skipped, never an error. Known-entry rows are
    /// append-only and are never reported as new again.
    async fn record_entries(&self, url: &str, ids: &[String]) -> Result<(), StoreError>;
}
