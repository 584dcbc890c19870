//! Webhook Transport
//!
//! The seam between the dispatcher and the network. `HttpTransport` posts
//! through reqwest; tests substitute their own implementation.

use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;

use webhook_sender_core::{build_http_client, CoreResult, ProxyConfig};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// The request could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportFault(pub String);

/// Async trait for posting a JSON body to a URL.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST `body` with `Content-Type: application/json`.
    ///
    /// Any HTTP status counts as a completed exchange; only faults that keep
    /// a response from arriving are errors.
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, TransportFault>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport with the given proxy and request timeout.
    pub fn from_settings(proxy: Option<&ProxyConfig>, timeout: Option<Duration>) -> CoreResult<Self> {
        Ok(Self::new(build_http_client(proxy, timeout)?))
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<TransportResponse, TransportFault> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportFault(describe_error(&e)))?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let message = describe_error(&e);
                tracing::warn!(
                    "Failed to read webhook response body (status {}): {}",
                    status,
                    message
                );
                format!("<failed to read response body: {}>", message)
            }
        };

        Ok(TransportResponse { status, body })
    }
}

/// Flatten a reqwest error and its sources into one readable line.
///
/// reqwest's own message is terse ("builder error", "error sending request");
/// the cause chain says what actually went wrong.
fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    if err.is_timeout() && !message.contains("timed out") {
        message.push_str(" (timed out)");
    }
    message
}
