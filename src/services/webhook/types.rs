//! Webhook Core Types
//!
//! Data types shared by the registry and the dispatcher: saved entries, the
//! outbound text envelope, send outcomes and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A saved webhook: a unique alias and its destination URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEntry {
    pub alias: String,
    pub url: String,
}

impl WebhookEntry {
    pub fn new(alias: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            url: url.into(),
        }
    }

    /// Selection label shown to the user, `"<alias> (<url>)"`.
    ///
    /// The registry's resolver accepts this label back as a destination.
    pub fn label(&self) -> String {
        display_label(&self.alias, &self.url)
    }
}

/// Format the selection label for an alias/URL pair.
pub fn display_label(alias: &str, url: &str) -> String {
    format!("{} ({})", alias, url)
}

/// Fixed message type tag of the outbound envelope.
pub const TEXT_MSGTYPE: &str = "text";

/// Outbound chat-webhook envelope:
/// `{"msgtype": "text", "text": {"content": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextMessage {
    pub msgtype: String,
    pub text: TextContent,
}

/// Body of a text message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextContent {
    pub content: String,
}

impl TextMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            msgtype: TEXT_MSGTYPE.to_string(),
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

/// Outcome of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    /// The endpoint answered HTTP 200.
    Success,
    /// Anything else.
    Failure(SendFailure),
}

impl SendResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// HTTP status if the endpoint answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success => Some(200),
            Self::Failure(SendFailure::Http { status_code, .. }) => Some(*status_code),
            Self::Failure(SendFailure::Transport { .. }) => None,
        }
    }
}

/// Why a delivery did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailure {
    /// The endpoint answered with a status other than 200.
    Http {
        status_code: u16,
        response_body: String,
    },
    /// The request never completed (DNS, refused connection, bad URL, timeout).
    Transport { message: String },
}

impl fmt::Display for SendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http {
                status_code,
                response_body,
            } => write!(
                f,
                "status code: {}\nresponse: {}",
                status_code, response_body
            ),
            Self::Transport { message } => write!(f, "request error: {}", message),
        }
    }
}

/// A required field was missing or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Alias must not be empty")]
    EmptyAlias,

    #[error("Webhook URL must not be empty")]
    EmptyUrl,

    #[error("Message content must not be empty")]
    EmptyContent,
}

/// Registry and dispatcher errors
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The registry file could not be written.
    #[error("Failed to persist webhooks: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
