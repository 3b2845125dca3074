//! Feed-ingestion fan-out engine.
//!
//! Polls every subscribed RSS/Atom feed on a fixed interval, diffs each
//! feed's entries against the set already delivered, and notifies every
//! subscriber of each new entry. The store, fetcher, and notifier sit
//! behind traits so the engine can be exercised without a network or a
//! database file.

pub mod config;
pub mod engine;
pub mod feed;
pub mod notify;
pub mod scheduler;
pub mod store;
pub mod util;
