//! Settings Models
//!
//! Application configuration and settings data structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use webhook_sender_core::ProxyConfig;

/// Default request timeout for webhook delivery, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound accepted for the request timeout, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Whole-request timeout for webhook delivery, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Optional outbound proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            proxy: None,
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub request_timeout_secs: Option<u64>,
    pub proxy: Option<ProxyConfig>,
    /// Remove the configured proxy. Applied before `proxy`.
    #[serde(default)]
    pub clear_proxy: bool,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if update.clear_proxy {
            self.proxy = None;
        }
        if let Some(proxy) = update.proxy {
            self.proxy = Some(proxy);
        }
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(format!(
                "request_timeout_secs must be between 1 and {}, got {}",
                MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            ));
        }

        if let Some(ref proxy) = self.proxy {
            proxy.validate()?;
        }

        Ok(())
    }
}
