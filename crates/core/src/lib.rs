//! Webhook Sender Core
//!
//! Shared building blocks for the Webhook Sender workspace. This crate has no
//! dependency on application-level code (registry storage, CLI, settings).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `proxy` - Proxy configuration data types
//! - `http_client` - `reqwest::Client` factory and URL redaction for logs

pub mod error;
pub mod http_client;
pub mod proxy;

pub use error::{CoreError, CoreResult};
pub use http_client::{build_http_client, redact_url};
pub use proxy::{ProxyConfig, ProxyProtocol};
