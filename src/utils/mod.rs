//! Utilities
//!
//! Error types and path helpers shared across the application.

pub mod error;
pub mod paths;

pub use error::*;
pub use paths::*;
