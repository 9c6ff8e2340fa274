//! Theme and Colors
//!
//! Palette for the chat surface. Connection states and notice levels each
//! get one colour so the status bar can be read at a glance.

use papo_core::{ConnectionState, NotifyLevel};
use ratatui::style::Color;

// ============================================================================
// UI Colors
// ============================================================================

/// Accent for the app name and separators
pub const PAPO_TEAL: Color = Color::Rgb(64, 196, 180);

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Faded lines at the edge of a scrolled log
pub const FADE_GRAY: Color = Color::Rgb(120, 120, 120);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 200, 90);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Colour for the connection indicator
pub fn connection_color(state: ConnectionState) -> Color {
    match state {
        ConnectionState::Connecting => WARNING_AMBER,
        ConnectionState::Open => SUCCESS_GREEN,
        ConnectionState::Closed => DIM_GRAY,
        ConnectionState::Errored => ERROR_RED,
    }
}

/// Colour for a notice
pub fn notice_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => PAPO_TEAL,
        NotifyLevel::Warning => WARNING_AMBER,
    }
}
