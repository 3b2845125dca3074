use std::time::Duration;

use futures::StreamExt;

use super::parser::parse_snapshot;
use super::types::{FeedFetcher, FeedSnapshot, FetchError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_BODY: usize = 10 * 1024 * 1024; // 10MB

/// HTTP-backed [`FeedFetcher`].
///
/// Each fetch is bounded by a timeout and a response-size cap; a timeout is
/// reported as [`FetchError::Timeout`] and treated by the engine like any
/// other fetch failure.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_body: usize,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            max_body: DEFAULT_MAX_BODY,
        }
    }

    pub fn with_limits(client: reqwest::Client, timeout: Duration, max_body: usize) -> Self {
        Self {
            client,
            timeout,
            max_body,
        }
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedSnapshot, FetchError> {
        // The deadline covers the whole exchange, headers and body: a
        // server that trickles bytes under the size cap must not hold the
        // poll loop open past the timeout.
        let bytes = tokio::time::timeout(self.timeout, async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(FetchError::Network)?;

            if !response.status().is_success() {
                return Err(FetchError::HttpStatus(response.status().as_u16()));
            }

            read_limited_bytes(response, self.max_body).await
        })
        .await
        .map_err(|_| FetchError::Timeout)??;

        parse_snapshot(&bytes)
    }
}

/// Stream the response body, failing once it exceeds `limit`.
async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
