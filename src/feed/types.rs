use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while fetching a feed.
///
/// The engine treats every variant identically: log, skip the feed for
/// this cycle, continue with the others.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Document could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the configured size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A feed's state as of one fetch. Ephemeral: never persisted, only the ids
/// of entries identified as new end up in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Entries in document order. Order is preserved for delivery but has
    /// no bearing on dedup correctness.
    pub entries: Vec<FeedEntry>,
}

/// One item within a feed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Stable identifier used for deduplication. Opaque.
    pub id: String,
    pub title: Option<String>,
    pub link: Option<String>,
}

// ============================================================================
// Fetcher Contract
// ============================================================================

/// Collaborator boundary that turns a feed URL into a parsed snapshot.
#[allow(async_fn_in_trait)]
pub trait FeedFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedSnapshot, FetchError>;
}
