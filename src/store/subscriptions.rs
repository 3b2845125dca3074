use std::collections::HashSet;

use sqlx::SqliteConnection;

use super::schema::Database;
use super::types::{StoreError, Subscription, SubscriptionStore};

/// Resolve a feed's internal id by URL within an open transaction.
///
/// Every mutating operation that depends on feed existence goes through
/// this inside the same transaction as its dependent write, so the write
/// can never land against a stale id.
async fn feed_id_by_url(
    conn: &mut SqliteConnection,
    url: &str,
) -> Result<Option<i64>, StoreError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM feeds WHERE url = ?")
        .bind(url)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(|(id,)| id))
}

impl SubscriptionStore for Database {
    async fn add_subscription(&self, subscriber: &str, url: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO feeds (url) VALUES (?) ON CONFLICT (url) DO NOTHING")
            .bind(url)
            .execute(&mut *tx)
            .await?;

        let feed_id = feed_id_by_url(&mut tx, url)
            .await?
            .ok_or_else(|| StoreError::FeedNotFound(url.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO subscriptions (subscriber, feed_id)
            VALUES (?, ?)
            ON CONFLICT (subscriber, feed_id) DO NOTHING
        "#,
        )
        .bind(subscriber)
        .bind(feed_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn remove_subscription(&self, subscriber: &str, url: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Unknown feed means there is nothing to remove.
        let Some(feed_id) = feed_id_by_url(&mut tx, url).await? else {
            return Ok(());
        };

        sqlx::query("DELETE FROM subscriptions WHERE subscriber = ? AND feed_id = ?")
            .bind(subscriber)
            .bind(feed_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_subscriptions(&self, subscriber: &str) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT feeds.url
            FROM subscriptions
            JOIN feeds ON feeds.id = subscriptions.feed_id
            WHERE subscriptions.subscriber = ?
        "#,
        )
        .bind(subscriber)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(url,)| url).collect())
    }

    async fn all_subscriptions(&self) -> Result<Vec<Subscription>, StoreError> {
        // A single SELECT is a consistent snapshot under SQLite's isolation.
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT feeds.url, subscriptions.subscriber
            FROM subscriptions
            JOIN feeds ON feeds.id = subscriptions.feed_id
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(url, subscriber)| Subscription { url, subscriber })
            .collect())
    }

    async fn known_entries(&self, url: &str) -> Result<HashSet<String>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let feed_id = feed_id_by_url(&mut tx, url)
            .await?
            .ok_or_else(|| StoreError::FeedNotFound(url.to_string()))?;

        let rows: Vec<(String,)> = sqlx::query_as("SELECT entry_id FROM entries WHERE feed_id = ?")
            .bind(feed_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn record_entries(&self, url: &str, ids: &[String]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let feed_id = feed_id_by_url(&mut tx, url)
            .await?
            .ok_or_else(|| StoreError::FeedNotFound(url.to_string()))?;

        for entry_id in ids {
            sqlx::query(
                r#"
                INSERT INTO entries (feed_id, entry_id)
                VALUES (?, ?)
                ON CONFLICT (entry_id, feed_id) DO NOTHING
            "#,
            )
            .bind(feed_id)
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
