//! In-Process Transport
//!
//! Channel-backed transport with no network underneath. The other end is a
//! [`RelayHandle`] that plays the relay: it sees every frame the client sends
//! and can inject frames, closes and errors.
//!
//! # Usage
//!
//! ```ignore
//! let (transport, mut relay) = InProcessTransport::new_pair();
//! let mut session = SessionManager::open(Box::new(transport), Identity::default(), tx).await;
//! session.process_next_event().await; // Opened
//!
//! assert_eq!(relay.next_sent().await.as_deref(), Some(r#"{"type":"join_chat","username":"Guest"}"#));
//! relay.push_frame(r#"{"type":"user_joined","username":"Bob"}"#).await;
//! ```

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::traits::{RelayTransport, TransportError, TransportEvent};

/// Default channel capacity for both directions
const DEFAULT_CAPACITY: usize = 100;

/// In-process transport using tokio channels
pub struct InProcessTransport {
    /// Frames sent by the client, read by the relay handle
    sent_tx: mpsc::Sender<String>,
    /// Events injected by the relay handle
    event_rx: mpsc::Receiver<TransportEvent>,
    /// Used once, to report the outcome of `connect`
    connect_tx: Option<mpsc::Sender<TransportEvent>>,
    /// Connection state
    connected: bool,
    /// Make `connect` fail, to exercise the error path
    refuse_connect: bool,
}

/// The relay's end of an [`InProcessTransport`]
pub struct RelayHandle {
    sent_rx: mpsc::Receiver<String>,
    event_tx: mpsc::Sender<TransportEvent>,
}

impl InProcessTransport {
    /// Create a transport and the relay handle driving it
    #[must_use]
    pub fn new_pair() -> (Self, RelayHandle) {
        Self::new_pair_with_capacity(DEFAULT_CAPACITY)
    }

    /// Create with custom channel capacity
    #[must_use]
    pub fn new_pair_with_capacity(capacity: usize) -> (Self, RelayHandle) {
        let (sent_tx, sent_rx) = mpsc::channel(capacity);
        let (event_tx, event_rx) = mpsc::channel(capacity);

        let transport = Self {
            sent_tx,
            event_rx,
            connect_tx: Some(event_tx.clone()),
            connected: false,
            refuse_connect: false,
        };

        (transport, RelayHandle { sent_rx, event_tx })
    }

    /// Make `connect` report a connection error instead of opening
    #[must_use]
    pub fn refusing(mut self) -> Self {
        self.refuse_connect = true;
        self
    }
}

#[async_trait]
impl RelayTransport for InProcessTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        let Some(connect_tx) = self.connect_tx.take() else {
            return Err(TransportError::InvalidState(
                "Connection already started".to_string(),
            ));
        };

        let outcome = if self.refuse_connect {
            TransportEvent::Error(
                TransportError::ConnectionFailed(
                    "in-process relay refused the connection".to_string(),
                )
                .to_string(),
            )
        } else {
            self.connected = true;
            TransportEvent::Opened
        };

        connect_tx
            .send(outcome)
            .await
            .map_err(|_| TransportError::ConnectionClosed)
    }

    async fn send(&self, frame: String) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::InvalidState(
                "Transport not connected".to_string(),
            ));
        }

        self.sent_tx
            .send(frame)
            .await
            .map_err(|_| TransportError::SendFailed("Channel closed".to_string()))
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        let event = self.event_rx.recv().await?;
        if matches!(event, TransportEvent::Closed { .. } | TransportEvent::Error(_)) {
            self.connected = false;
        }
        Some(event)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl RelayHandle {
    /// Deliver a text frame to the client
    pub async fn push_frame(&self, raw: impl Into<String>) {
        let _ = self.event_tx.send(TransportEvent::Frame(raw.into())).await;
    }

    /// Close the connection from the relay side
    pub async fn close(&self, reason: Option<&str>) {
        let _ = self
            .event_tx
            .send(TransportEvent::Closed {
                reason: reason.map(str::to_string),
            })
            .await;
    }

    /// Break the connection with an error
    pub async fn fail(&self, error: impl Into<String>) {
        let _ = self.event_tx.send(TransportEvent::Error(error.into())).await;
    }

    /// Wait for the next frame the client sent
    pub async fn next_sent(&mut self) -> Option<String> {
        self.sent_rx.recv().await
    }

    /// All frames sent so far that have not been read yet (non-blocking)
    pub fn drain_sent(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.sent_rx.try_recv() {
            frames.push(frame);
        }
        frames
    }
}
