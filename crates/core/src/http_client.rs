//! HTTP Client Factory
//!
//! Builds the `reqwest::Client` used for webhook delivery, with optional proxy
//! and request timeout.

use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::proxy::ProxyConfig;

/// Build a `reqwest::Client` with the resolved proxy and timeout.
///
/// - `Some(proxy)` -> route every request through the proxy
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
/// - `timeout` bounds the whole request, connect through body read
pub fn build_http_client(
    proxy: Option<&ProxyConfig>,
    timeout: Option<Duration>,
) -> CoreResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    match proxy {
        Some(cfg) => {
            cfg.validate().map_err(CoreError::InvalidProxy)?;
            let url = cfg.url();
            let mut p = reqwest::Proxy::all(&url)
                .map_err(|e| CoreError::InvalidProxy(format!("{}: {}", url, e)))?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }

    builder
        .build()
        .map_err(|e| CoreError::HttpClient(e.to_string()))
}

/// Strip credentials, query and fragment from a URL before it is logged.
///
/// Chat webhooks usually carry their access token in the query string
/// (`?key=...`, `?access_token=...`). Strings that do not parse as URLs are
/// returned unchanged.
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            let had_query = parsed.query().is_some();
            parsed.set_query(None);
            parsed.set_fragment(None);
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            let mut out = parsed.to_string();
            if had_query {
                out.push_str("?<redacted>");
            }
            out
        }
        Err(_) => raw.to_string(),
    }
}
