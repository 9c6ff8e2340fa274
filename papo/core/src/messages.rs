//! Session Messages
//!
//! Messages sent from the [`SessionManager`](crate::session::SessionManager)
//! to whatever surface is rendering the chat. Surfaces are pure renderers:
//! they append lines, show notices and reflect the connection state, and
//! never interpret the wire protocol themselves.

use std::fmt;

/// Messages from the session to a UI surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionMessage {
    /// One rendered line for the conversation log
    Line(String),

    /// Something the user should notice right away (not part of the log)
    Notice {
        /// Severity
        level: NotifyLevel,
        /// Text to show
        text: String,
    },

    /// The connection moved to a new lifecycle state
    State(ConnectionState),

    /// The local display name changed
    IdentityChanged(String),
}

/// Notification level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
}

/// Lifecycle of the single relay connection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Transport is being established
    #[default]
    Connecting,
    /// Transport is up; intents may be sent
    Open,
    /// Relay or network closed the connection
    Closed,
    /// Connection failed or broke
    Errored,
}

impl ConnectionState {
    /// Whether `self -> next` is an allowed transition
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Open | Self::Errored) | (Self::Open, Self::Closed | Self::Errored)
        )
    }

    /// `Closed` and `Errored` end the session; there is no reconnect
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }

    /// Human-readable description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Connecting => "Conectando...",
            Self::Open => "Conectado",
            Self::Closed => "Desconectado",
            Self::Errored => "Erro de conexão",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}
