//! The poll cycle: fetch every distinct subscribed feed once, deliver
//! entries not seen before, record them as known.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};

use crate::feed::{FeedEntry, FeedFetcher};
use crate::notify::{render_entry_notice, Notifier};
use crate::store::SubscriptionStore;

/// Max feeds fetched and processed simultaneously within one cycle.
const MAX_CONCURRENT_FEEDS: usize = 8;

/// Drives one full pass over all subscribed feeds.
///
/// Holds its collaborators by value; construct one per process and hand it
/// to the [`Scheduler`](crate::scheduler::Scheduler). All errors below
/// [`run_one_cycle`](Self::run_one_cycle) are logged and contained, never
/// propagated: one feed's failure must not abort the cycle, and no cycle
/// failure may reach the scheduler loop.
pub struct PollEngine<S, F, N> {
    store: S,
    fetcher: F,
    notifier: N,
}

impl<S, F, N> PollEngine<S, F, N>
where
    S: SubscriptionStore,
    F: FeedFetcher,
    N: Notifier,
{
    pub fn new(store: S, fetcher: F, notifier: N) -> Self {
        Self {
            store,
            fetcher,
            notifier,
        }
    }

    /// Run one complete poll cycle.
    ///
    /// Reads all subscriptions, inverts them into URL → subscribers so each
    /// distinct feed is fetched exactly once regardless of subscriber count,
    /// then processes feeds independently with bounded concurrency.
    pub async fn run_one_cycle(&self) {
        let subscriptions = match self.store.all_subscriptions().await {
            Ok(subs) => subs,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read subscriptions, skipping cycle");
                return;
            }
        };

        let mut fanout: HashMap<String, Vec<String>> = HashMap::new();
        for sub in subscriptions {
            fanout.entry(sub.url).or_default().push(sub.subscriber);
        }

        if fanout.is_empty() {
            tracing::debug!("No subscriptions, nothing to poll");
            return;
        }

        let total = fanout.len();
        stream::iter(fanout)
            .for_each_concurrent(MAX_CONCURRENT_FEEDS, |(url, subscribers)| async move {
                self.process_feed(&url, &subscribers).await;
            })
            .await;

        tracing::debug!(feeds = total, "Poll cycle complete");
    }

    /// Fetch one feed, deliver its new entries, record them as known.
    ///
    /// Recording happens once, after all delivery attempts, even when some
    /// deliveries failed: an entry that missed one subscriber is still
    /// marked known rather than retried, bounding duplicate noise to a
    /// single cycle on persistent delivery failures.
    async fn process_feed(&self, url: &str, subscribers: &[String]) {
        let snapshot = match self.fetcher.fetch(url).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(feed = %url, error = %e, "Fetch failed, skipping feed this cycle");
                return;
            }
        };

        let known = match self.store.known_entries(url).await {
            Ok(known) => known,
            Err(e) => {
                tracing::warn!(feed = %url, error = %e, "Failed to load known entries, skipping feed this cycle");
                return;
            }
        };

        // Guard against a snapshot listing the same id twice.
        let mut seen: HashSet<&str> = HashSet::new();
        let new_entries: Vec<&FeedEntry> = snapshot
            .entries
            .iter()
            .filter(|e| !known.contains(&e.id) && seen.insert(e.id.as_str()))
            .collect();

        if new_entries.is_empty() {
            return;
        }

        for &entry in &new_entries {
            let message = render_entry_notice(&snapshot, entry);
            for subscriber in subscribers {
                if let Err(e) = self.notifier.notify(subscriber, &message).await {
                    tracing::warn!(
                        feed = %url,
                        subscriber = %subscriber,
                        entry = %entry.id,
                        error = %e,
                        "Delivery failed"
                    );
                }
            }
        }

        let ids: Vec<String> = new_entries.iter().map(|e| e.id.clone()).collect();
        if let Err(e) = self.store.record_entries(url, &ids).await {
            tracing::error!(feed = %url, error = %e, "Failed to record delivered entries");
            return;
        }

        tracing::info!(
            feed = %url,
            new = ids.len(),
            subscribers = subscribers.len(),
            "Delivered new entries"
        );
    }
}
