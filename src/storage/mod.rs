//! Storage Layer
//!
//! Handles all data persistence: the webhook registry file and JSON config.

pub mod config;
pub mod registry_store;

pub use config::*;
pub use registry_store::*;
