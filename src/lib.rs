//! Webhook Sender - Library
//!
//! Save named chat-webhook endpoints and post short text messages to them.
//! It includes:
//! - Command handlers for the user-facing shell
//! - The webhook registry and message dispatcher
//! - Storage for the registry file and JSON config
//! - Settings models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use commands::{
    get_settings, list_webhooks, save_webhook, send_message, update_settings, DeliveryReport,
    SaveWebhookRequest, SendMessageRequest, WebhookListing,
};
pub use models::response::CommandResponse;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use state::{AppState, StateOptions};
pub use utils::error::{AppError, AppResult};
