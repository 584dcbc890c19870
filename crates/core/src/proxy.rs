//! Proxy Configuration Types
//!
//! Outbound webhook calls may need to leave a corporate network through a
//! proxy. These types describe that proxy; the client factory in
//! `http_client` turns them into a configured `reqwest::Client`.

use serde::{Deserialize, Serialize};

/// Proxy protocol type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    Http,
    Https,
    Socks5,
}

impl ProxyProtocol {
    /// Return the URL scheme string for this protocol.
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyProtocol::Http => "http",
            ProxyProtocol::Https => "https",
            ProxyProtocol::Socks5 => "socks5",
        }
    }
}

/// Proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyConfig {
    pub protocol: ProxyProtocol,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password is supplied at runtime (environment) and only held in memory.
    /// Excluded from serialization so it never lands in config.json.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Build the proxy URL string (without auth).
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol.scheme(), self.host, self.port)
    }

    /// Check that the proxy can be turned into a URL reqwest will accept.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("proxy host must not be empty".to_string());
        }
        if self
            .host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '@' | '?' | '#'))
        {
            return Err(format!("invalid proxy host '{}'", self.host));
        }
        if self.port == 0 {
            return Err("proxy port must be non-zero".to_string());
        }
        match url::Url::parse(&self.url()) {
            Ok(parsed) if parsed.host_str().is_some() => Ok(()),
            Ok(_) => Err(format!("invalid proxy host '{}'", self.host)),
            Err(e) => Err(format!("invalid proxy host '{}': {}", self.host, e)),
        }
    }
}
