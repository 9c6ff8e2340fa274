//! Papo TUI - Terminal client for the papo relay chat
//!
//! Two surfaces over the same `papo-core` session:
//!
//! - **App**: full-screen ratatui interface with a scrolling conversation
//!   log, input box and status bar
//! - **Plain**: line mode for pipes and dumb terminals
//!
//! Neither surface knows the wire protocol; both just apply
//! `SessionMessage`s and forward user input.

pub mod app;
pub mod commands;
pub mod display;
pub mod plain;
pub mod theme;

pub use app::App;
pub use plain::PlainSurface;
