//! Feed fetching and parsing.
//!
//! [`FeedFetcher`] is the engine's collaborator boundary: URL in, parsed
//! [`FeedSnapshot`] out. The production implementation ([`HttpFetcher`])
//! retrieves the document over HTTP with a timeout and a body size cap,
//! then parses it with `feed-rs`. Tests substitute their own fetcher.

mod fetcher;
mod parser;
mod types;

pub use fetcher::HttpFetcher;
pub use parser::parse_snapshot;
pub use types::{FeedEntry, FeedFetcher, FeedSnapshot, FetchError};
