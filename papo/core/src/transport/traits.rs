//! Transport Traits
//!
//! The client side of the relay connection. A transport moves raw text
//! frames; it knows nothing about the chat protocol.

use async_trait::async_trait;

/// Something that happened on the connection
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection finished opening; frames may now be sent
    Opened,
    /// A text frame arrived from the relay
    Frame(String),
    /// The connection was closed (by the relay or the network)
    Closed {
        /// Close reason, if the peer sent one
        reason: Option<String>,
    },
    /// The connection broke
    Error(String),
}

/// Errors that can occur during transport operations
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the relay
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Connecting took longer than the configured timeout
    #[error("Connection timed out after {0} ms")]
    Timeout(u64),
    /// Failed to hand a frame to the connection
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// Transport not in expected state
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Connection was closed
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Transport to the relay
///
/// Implementations own the underlying connection and pump frames in the
/// background; callers only see text in and [`TransportEvent`]s out.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Start opening the connection to the relay.
    ///
    /// Returns as soon as the attempt is under way. The outcome arrives
    /// through [`recv`](Self::recv) as [`TransportEvent::Opened`] or
    /// [`TransportEvent::Error`]. Only one attempt is allowed per transport.
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Queue a text frame for the relay
    async fn send(&self, frame: String) -> Result<(), TransportError>;

    /// Wait for the next connection event.
    ///
    /// Returns `None` once the transport has nothing more to report.
    async fn recv(&mut self) -> Option<TransportEvent>;

    /// Close the connection
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;
}
