use feed_rs::parser;
use sha2::{Digest, Sha256};

use super::types::{FeedEntry, FeedSnapshot, FetchError};

/// Parse a fetched document into a [`FeedSnapshot`].
///
/// Handles both RSS and Atom via `feed-rs`. Entries without an id get a
/// stable digest of their link and title instead, so deduplication still
/// has a key that survives re-fetches.
pub fn parse_snapshot(bytes: &[u8]) -> Result<FeedSnapshot, FetchError> {
    let feed = parser::parse(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

    let title = feed.title.map(|t| t.content);
    let link = feed.links.first().map(|l| l.href.clone());

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let title = entry.title.map(|t| t.content);

            let existing_id = if entry.id.trim().is_empty() {
                None
            } else {
                Some(entry.id.as_str())
            };
            let id = generate_entry_id(existing_id, link.as_deref(), title.as_deref());

            FeedEntry { id, title, link }
        })
        .collect();

    Ok(FeedSnapshot {
        title,
        link,
        entries,
    })
}

fn generate_entry_id(existing: Option<&str>, link: Option<&str>, title: Option<&str>) -> String {
    if let Some(id) = existing {
        return id.trim().to_string();
    }

    let input = format!("{}|{}", link.unwrap_or(""), title.unwrap_or(""));
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}
