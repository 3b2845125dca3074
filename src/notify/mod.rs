//! Outbound delivery of rendered notices.
//!
//! [`Notifier`] is the delivery collaborator boundary. The production
//! implementation ([`WebhookNotifier`]) posts each notice as JSON to a
//! configured endpoint; the engine never cares how a notice reaches its
//! subscriber.

mod render;

pub use render::render_entry_notice;

use thiserror::Error;

/// A single subscriber notification failed. Logged by the engine; never
/// blocks other subscribers or the entry's known-status.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
}

#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Deliver one rendered HTML notice to one subscriber.
    async fn notify(&self, subscriber: &str, html: &str) -> Result<(), DeliveryError>;
}

/// Posts notices to a webhook endpoint as `{"subscriber": ..., "html": ...}`.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    async fn notify(&self, subscriber: &str, html: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "subscriber": subscriber,
                "html": html,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
