//! Session Manager
//!
//! Owns the relay connection and the local [`Identity`], and is the only
//! place that knows the chat protocol's rules:
//!
//! - nothing is transmitted unless the connection is [`ConnectionState::Open`]
//! - entering `Open` announces the current identity with `JoinChat`
//! - renaming while `Open` re-announces over the same connection
//! - every inbound frame becomes exactly one rendered line
//!
//! The session talks to its surface through `SessionMessage`s on an mpsc
//! channel, the same way regardless of whether the surface is a full-screen
//! TUI, a line-mode terminal or a test.
//!
//! # Connection lifecycle
//!
//! ```text
//!              Opened
//! Connecting ─────────▶ Open ──── Closed ───▶ Closed
//!     │                  │
//!     │ Error            │ Error
//!     ▼                  ▼
//!  Errored            Errored
//! ```
//!
//! `Closed` and `Errored` are terminal: there is no reconnect.

use tokio::sync::mpsc;

use crate::identity::Identity;
use crate::messages::{ConnectionState, NotifyLevel, SessionMessage};
use crate::protocol::{self, ClientIntent, RelayEvent};
use crate::transport::{RelayTransport, TransportEvent};

/// Shown when the user tries to send before the connection is open
pub const NOT_READY_NOTICE: &str = "⚠️ Conexão com o servidor ainda não foi estabelecida.";

/// Result of [`SessionManager::send_chat_message`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing to do
    Empty,
    /// Connection not open; the user was warned and nothing was sent
    NotReady(ConnectionState),
    /// The transport refused the frame; the input is kept
    Failed,
    /// Message handed to the transport and input cleared
    Sent,
}

/// Result of [`SessionManager::rename_identity`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenameOutcome {
    /// No name given; identity unchanged
    Ignored,
    /// Identity changed
    Renamed {
        /// Whether a `JoinChat` with the new name reached the transport
        announced: bool,
    },
}

/// Session over a single relay connection
pub struct SessionManager {
    /// The one connection this session will ever use
    transport: Box<dyn RelayTransport>,
    /// Name announced to the relay
    identity: Identity,
    /// Connection lifecycle state
    state: ConnectionState,
    /// Channel to send messages to the UI surface
    tx: mpsc::Sender<SessionMessage>,
}

impl SessionManager {
    /// Create a session in the `Connecting` state without touching the transport
    pub fn new(
        transport: Box<dyn RelayTransport>,
        identity: Identity,
        tx: mpsc::Sender<SessionMessage>,
    ) -> Self {
        Self {
            transport,
            identity,
            state: ConnectionState::Connecting,
            tx,
        }
    }

    /// Create a session and immediately start opening its connection.
    ///
    /// The session stays `Connecting` until the transport reports the
    /// outcome through [`handle_transport_event`](Self::handle_transport_event).
    pub async fn open(
        transport: Box<dyn RelayTransport>,
        identity: Identity,
        tx: mpsc::Sender<SessionMessage>,
    ) -> Self {
        let mut session = Self::new(transport, identity, tx);
        session.connect().await;
        session
    }

    /// Start the transport connection
    pub async fn connect(&mut self) {
        if self.state != ConnectionState::Connecting {
            tracing::debug!(state = %self.state, "Connect ignored");
            return;
        }

        if let Err(e) = self.transport.connect().await {
            tracing::warn!(error = %e, "Failed to start relay connection");
            self.transition(ConnectionState::Errored).await;
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether intents may be sent right now
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Current identity
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    // ============================================
    // User actions
    // ============================================

    /// Send the contents of the input buffer as a chat message.
    ///
    /// Whitespace-only input is ignored. If the connection is not open the
    /// user gets a warning notice and nothing is sent or queued. On success
    /// the buffer is cleared.
    pub async fn send_chat_message(&mut self, input: &mut String) -> SendOutcome {
        let text = input.trim().to_string();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        if !self.is_open() {
            tracing::warn!(state = %self.state, "Message not sent: connection not open");
            self.emit(SessionMessage::Notice {
                level: NotifyLevel::Warning,
                text: NOT_READY_NOTICE.to_string(),
            })
            .await;
            return SendOutcome::NotReady(self.state);
        }

        if self.transmit(&ClientIntent::SendMessage { text }).await {
            input.clear();
            SendOutcome::Sent
        } else {
            SendOutcome::Failed
        }
    }

    /// Change the display name.
    ///
    /// `None` or an empty name (a cancelled prompt) leaves everything as is.
    /// The new name always takes effect locally; it is announced to the relay
    /// only if the connection is open.
    pub async fn rename_identity(&mut self, new_name: Option<&str>) -> RenameOutcome {
        if !self.identity.rename(new_name) {
            return RenameOutcome::Ignored;
        }

        tracing::info!(username = %self.identity, "Identity changed");
        self.emit(SessionMessage::IdentityChanged(
            self.identity.username().to_string(),
        ))
        .await;

        let announced = self.is_open() && self.announce().await;
        RenameOutcome::Renamed { announced }
    }

    /// Close the connection from this side (surface is going away)
    pub async fn close(&mut self) {
        if let Err(e) = self.transport.close().await {
            tracing::warn!(error = %e, "Error closing relay connection");
        }
        if self.is_open() {
            self.transition(ConnectionState::Closed).await;
        }
    }

    // ============================================
    // Transport events
    // ============================================

    /// Wait for the next event from the transport
    pub async fn next_transport_event(&mut self) -> Option<TransportEvent> {
        self.transport.recv().await
    }

    /// Wait for and handle one transport event.
    ///
    /// Returns `false` when the transport has nothing more to report.
    pub async fn process_next_event(&mut self) -> bool {
        match self.next_transport_event().await {
            Some(event) => {
                self.handle_transport_event(event).await;
                true
            }
            None => false,
        }
    }

    /// React to a connection event
    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                self.transition(ConnectionState::Open).await;
            }
            TransportEvent::Frame(raw) => {
                self.on_inbound_frame(&raw).await;
            }
            TransportEvent::Closed { reason } => {
                tracing::info!(?reason, "Relay connection closed");
                self.transition(ConnectionState::Closed).await;
            }
            TransportEvent::Error(error) => {
                // Logged only; relay-sent `error` frames are the ones users see
                tracing::warn!(error = %error, state = %self.state, "Relay transport error");
                self.transition(ConnectionState::Errored).await;
            }
        }
    }

    /// Decode one frame and emit its rendered line
    pub async fn on_inbound_frame(&mut self, raw: &str) -> RelayEvent {
        let event = protocol::decode(raw);
        if event.is_unknown() {
            tracing::debug!(raw = %raw, "Rendering unknown frame");
        }

        self.emit(SessionMessage::Line(event.to_string())).await;
        event
    }

    // ============================================
    // Internals
    // ============================================

    /// Move to `next` if the lifecycle allows it
    async fn transition(&mut self, next: ConnectionState) -> bool {
        if !self.state.can_transition_to(next) {
            tracing::debug!(from = %self.state, to = %next, "Rejected state transition");
            return false;
        }

        tracing::info!(from = %self.state, to = %next, "Connection state changed");
        self.state = next;
        self.emit(SessionMessage::State(next)).await;

        if next == ConnectionState::Open {
            self.announce().await;
        }
        true
    }

    /// Tell the relay who we are
    async fn announce(&self) -> bool {
        let intent = ClientIntent::JoinChat {
            username: self.identity.username().to_string(),
        };
        self.transmit(&intent).await
    }

    /// Encode and hand an intent to the transport; only ever while open
    async fn transmit(&self, intent: &ClientIntent) -> bool {
        if !self.is_open() {
            tracing::debug!(kind = intent.kind(), state = %self.state, "Intent dropped");
            return false;
        }

        let frame = match protocol::encode(intent) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode intent");
                return false;
            }
        };

        match self.transport.send(frame).await {
            Ok(()) => {
                tracing::debug!(kind = intent.kind(), "Intent sent");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = intent.kind(), "Transport rejected intent");
                false
            }
        }
    }

    async fn emit(&self, msg: SessionMessage) {
        if self.tx.send(msg).await.is_err() {
            tracing::debug!("Surface receiver dropped");
        }
    }
}
