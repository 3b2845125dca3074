use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::types::{StoreError, Subscription, SubscriptionStore};

#[derive(Debug, Default)]
struct Inner {
    /// URL → subscribers. A feed stays in this map with an empty set after
    /// its last unsubscribe, mirroring the durable store keeping the row.
    subscribers: BTreeMap<String, BTreeSet<String>>,
    /// URL → delivered entry ids. Append-only.
    entries: BTreeMap<String, HashSet<String>>,
}

/// In-memory subscription store.
///
/// Satisfies the same contract as [`Database`](super::Database) without a
/// database file. Used by the engine and scheduler tests; state does not
/// survive the process. Cheap to clone (shares the inner maps).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionStore for MemoryStore {
    async fn add_subscription(&self, subscriber: &str, url: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .subscribers
            .entry(url.to_string())
            .or_default()
            .insert(subscriber.to_string());
        inner.entries.entry(url.to_string()).or_default();
        Ok(())
    }

    async fn remove_subscription(&self, subscriber: &str, url: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(subscribers) = inner.subscribers.get_mut(url) {
            subscribers.remove(subscriber);
        }
        Ok(())
    }

    async fn list_subscriptions(&self, subscriber: &str) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .subscribers
            .iter()
            .filter(|(_, subs)| subs.contains(subscriber))
            .map(|(url, _)| url.clone())
            .collect())
    }

    async fn all_subscriptions(&self) -> Result<Vec<Subscription>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .subscribers
            .iter()
            .flat_map(|(url, subs)| {
                subs.iter().map(|subscriber| Subscription {
                    url: url.clone(),
                    subscriber: subscriber.clone(),
                })
            })
            .collect())
    }

    async fn known_entries(&self, url: &str) -> Result<HashSet<String>, StoreError> {
        let inner = self.inner.read().await;
        inner
            .entries
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::FeedNotFound(url.to_string()))
    }

    async fn record_entries(&self, url: &str, ids: &[String]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let known = inner
            .entries
            .get_mut(url)
            .ok_or_else(|| StoreError::FeedNotFound(url.to_string()))?;
        known.extend(ids.iter().cloned());
        Ok(())
    }
}
