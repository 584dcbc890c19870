//! Webhook Commands
//!
//! One function per user action: list saved webhooks, save a webhook, send a
//! message. Each catches its own errors and reports them in the returned
//! `CommandResponse`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use webhook_sender_core::redact_url;

use crate::models::response::CommandResponse;
use crate::services::webhook::types::*;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to save (insert or overwrite) a webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveWebhookRequest {
    pub alias: String,
    pub url: String,
}

/// Request to send a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// A selection label (`"<alias> (<url>)"`) or a raw URL
    pub target: String,
    pub content: String,
}

/// A saved webhook as shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookListing {
    pub alias: String,
    pub url: String,
    pub label: String,
}

impl From<WebhookEntry> for WebhookListing {
    fn from(entry: WebhookEntry) -> Self {
        let label = entry.label();
        Self {
            alias: entry.alias,
            url: entry.url,
            label,
        }
    }
}

/// Result of a successful send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Destination with credentials and query stripped
    pub destination: String,
    pub status_code: u16,
    pub latency_ms: u64,
    pub sent_at: String,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// List all saved webhooks in alias order.
pub fn list_webhooks(state: &AppState) -> CommandResponse<Vec<WebhookListing>> {
    CommandResponse::ok(state.registry().entries().map(WebhookListing::from).collect())
}

/// Save a webhook and persist the full registry.
///
/// The registry held in `state` only changes once the file write succeeded.
pub fn save_webhook(
    state: &mut AppState,
    request: SaveWebhookRequest,
) -> CommandResponse<WebhookListing> {
    save_webhook_inner(state, request).into()
}

fn save_webhook_inner(state: &mut AppState, request: SaveWebhookRequest) -> AppResult<WebhookListing> {
    let mut candidate = state.registry().clone();
    let previous = candidate.upsert(&request.alias, &request.url)?;
    state.store().save(&candidate)?;

    let entry = WebhookEntry::new(request.alias.trim(), request.url.trim());
    if previous.is_some() {
        tracing::info!("Updated webhook '{}'", entry.alias);
    } else {
        tracing::info!("Added webhook '{}'", entry.alias);
    }
    state.replace_registry(candidate);

    Ok(entry.into())
}

/// Resolve the target and send one message.
///
/// A non-200 answer or network fault comes back as an error response
/// carrying the status and body, or the fault description.
pub async fn send_message(
    state: &AppState,
    request: SendMessageRequest,
) -> CommandResponse<DeliveryReport> {
    send_message_inner(state, request).await.into()
}

async fn send_message_inner(state: &AppState, request: SendMessageRequest) -> AppResult<DeliveryReport> {
    let destination = state.registry().resolve_destination(&request.target);

    let started = Instant::now();
    let result = state
        .dispatcher()
        .send(&destination, &request.content)
        .await?;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        SendResult::Success => Ok(DeliveryReport {
            destination: redact_url(&destination),
            status_code: 200,
            latency_ms,
            sent_at: chrono::Utc::now().to_rfc3339(),
        }),
        SendResult::Failure(failure) => Err(AppError::transport(failure.to_string())),
    }
}
