//! Message Dispatcher
//!
//! Validates a destination and message, wraps the message in the text
//! envelope and performs exactly one POST. No retry, no backoff.

use std::sync::Arc;

use webhook_sender_core::redact_url;

use super::transport::WebhookTransport;
use super::types::{SendFailure, SendResult, TextMessage, ValidationError};

/// Sends text messages to webhook URLs through a transport.
pub struct WebhookDispatcher {
    transport: Arc<dyn WebhookTransport>,
}

impl WebhookDispatcher {
    pub fn new(transport: Arc<dyn WebhookTransport>) -> Self {
        Self { transport }
    }

    /// Check both fields before any network activity.
    ///
    /// Returns the trimmed `(url, content)` pair that will actually be sent.
    pub fn validate<'a>(
        url: &'a str,
        content: &'a str,
    ) -> Result<(&'a str, &'a str), ValidationError> {
        let url = url.trim();
        let content = content.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok((url, content))
    }

    /// Serialize the JSON body for a message.
    pub fn build_body(content: &str) -> Result<String, serde_json::Error> {
        serde_json::to_string(&TextMessage::new(content))
    }

    /// Send one message.
    ///
    /// Validation failures are returned as `Err`; everything that happens
    /// after the request is attempted is reported through `SendResult`.
    pub async fn send(&self, url: &str, content: &str) -> Result<SendResult, ValidationError> {
        let (url, content) = Self::validate(url, content).map_err(|e| {
            tracing::debug!("Rejected send request: {}", e);
            e
        })?;

        let body = match Self::build_body(content) {
            Ok(body) => body,
            Err(e) => {
                return Ok(SendResult::Failure(SendFailure::Transport {
                    message: format!("failed to encode message: {}", e),
                }))
            }
        };

        let destination = redact_url(url);
        tracing::info!("Sending {} byte message to {}", body.len(), destination);

        let result = match self.transport.post_json(url, body).await {
            Ok(response) if response.status == 200 => SendResult::Success,
            Ok(response) => SendResult::Failure(SendFailure::Http {
                status_code: response.status,
                response_body: response.body,
            }),
            Err(fault) => SendResult::Failure(SendFailure::Transport { message: fault.0 }),
        };

        match &result {
            SendResult::Success => tracing::info!("Webhook {} accepted the message", destination),
            SendResult::Failure(failure) => {
                tracing::warn!("Webhook delivery to {} failed: {}", destination, failure)
            }
        }

        Ok(result)
    }
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookDispatcher").finish_non_exhaustive()
    }
}
