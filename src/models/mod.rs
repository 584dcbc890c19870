//! Data Models
//!
//! Settings and command response types used throughout the application.

pub mod response;
pub mod settings;

pub use response::*;
pub use settings::*;
