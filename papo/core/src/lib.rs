//! Papo Core - Headless Session Logic for the papo relay chat client
//!
//! This crate holds everything the chat client knows about talking to the
//! relay, completely independent of how the conversation is shown. It can
//! drive the full-screen TUI, the line-mode terminal, or run headless in
//! tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                          │
//! │   ┌──────────────┐   ┌──────────────┐   ┌───────────────┐   │
//! │   │     TUI      │   │  Line mode   │   │   Headless    │   │
//! │   │  (ratatui)   │   │   (stdio)    │   │   (tests)     │   │
//! │   └──────┬───────┘   └──────┬───────┘   └───────┬───────┘   │
//! │          └──────────────────┴───────────────────┘           │
//! │              user actions (up) │ SessionMessage (down)      │
//! └────────────────────────────────┼────────────────────────────┘
//!                                  │
//! ┌────────────────────────────────┼────────────────────────────┐
//! │                          PAPO CORE                          │
//! │   ┌────────────────────────────┴─────────────────────────┐  │
//! │   │                   SessionManager                     │  │
//! │   │   Identity · ConnectionState · protocol codec        │  │
//! │   └────────────────────────────┬─────────────────────────┘  │
//! │                    RelayTransport (text frames)             │
//! │          ┌─────────────────────┴──────────────────┐         │
//! │   ┌──────┴───────┐                        ┌───────┴──────┐  │
//! │   │  WebSocket   │                        │  InProcess   │  │
//! │   └──────────────┘                        └──────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use papo_core::{create_transport, ClientConfig, Identity, SessionManager};
//! use tokio::sync::mpsc;
//!
//! let config = ClientConfig::from_env();
//! let (tx, mut rx) = mpsc::channel(100);
//!
//! let transport = create_transport(&config)?;
//! let mut session =
//!     SessionManager::open(transport, Identity::new(config.username.clone()), tx).await;
//!
//! while session.process_next_event().await {
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`config`]: Client configuration from environment
//! - [`identity`]: Local display name
//! - [`messages`]: Messages from the session to UI surfaces
//! - [`protocol`]: Wire codec for relay frames
//! - [`session`]: Connection state machine and user actions
//! - [`transport`]: Relay connection (WebSocket, in-process)
//!
//! # No TUI Dependencies
//!
//! This crate has no dependency on ratatui, crossterm, or any other UI
//! framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod identity;
pub mod messages;
pub mod protocol;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use config::{ClientConfig, ConfigError, DEFAULT_RELAY_URL};
pub use identity::{Identity, DEFAULT_USERNAME};
pub use messages::{ConnectionState, NotifyLevel, SessionMessage};
pub use protocol::{decode, encode, ClientIntent, CodecError, RelayEvent};
pub use session::{RenameOutcome, SendOutcome, SessionManager, NOT_READY_NOTICE};
pub use transport::{
    create_transport, InProcessTransport, RelayHandle, RelayTransport, TransportError,
    TransportEvent, WebSocketTransport,
};
