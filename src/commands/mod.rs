//! Commands
//!
//! Entry points for user actions. Every command returns a `CommandResponse`
//! and never lets an error escape into the next action.

pub mod settings;
pub mod webhook;

pub use settings::*;
pub use webhook::*;
