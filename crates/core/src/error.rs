//! Core Error Types
//!
//! Errors raised while building HTTP clients from user configuration.
//! The application crate wraps these in its own `AppError`.

use thiserror::Error;

/// Core error type for the Webhook Sender workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The configured proxy could not be turned into a reqwest proxy
    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),

    /// The HTTP client could not be constructed (TLS backend, resolver, ...)
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;
