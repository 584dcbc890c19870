//! Webhook Sender Services
//!
//! Registry of saved webhook endpoints and the dispatcher that posts text
//! messages to them. The two never call each other; the command layer wires
//! alias resolution and delivery together.

pub mod dispatcher;
pub mod registry;
pub mod transport;
pub mod types;

pub use dispatcher::WebhookDispatcher;
pub use registry::WebhookRegistry;
pub use transport::{HttpTransport, TransportFault, TransportResponse, WebhookTransport};
pub use types::*;
