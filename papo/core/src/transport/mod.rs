//! Transport Layer
//!
//! Separates the connection mechanism from the session logic:
//! - `WebSocket`: the real connection to the relay
//! - `InProcess`: channel pair with a scriptable relay end, for tests and
//!   embedding
//!
//! Transports move text frames only. Encoding, decoding and the connection
//! state machine live in [`crate::session`].

pub mod factory;
pub mod in_process;
pub mod traits;
pub mod websocket;

// Re-exports for convenience
pub use factory::create_transport;
pub use in_process::{InProcessTransport, RelayHandle};
pub use traits::{RelayTransport, TransportError, TransportEvent};
pub use websocket::WebSocketTransport;
