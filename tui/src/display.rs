//! Display State Types
//!
//! What the terminal shows, derived only from `SessionMessage`s. The TUI is
//! a thin client: it never decodes frames or decides when to send; it keeps
//! the rendered log, the connection state, the current name and the latest
//! notice, and renders them.

use std::time::Duration;

use papo_core::{ConnectionState, NotifyLevel, SessionMessage, DEFAULT_USERNAME};

/// How long a notice stays on screen
pub const NOTICE_DURATION: Duration = Duration::from_secs(5);

/// A notice waiting to expire
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotice {
    /// Severity
    pub level: NotifyLevel,
    /// Text to show
    pub text: String,
    /// Time left on screen
    pub remaining: Duration,
}

/// Everything the surface renders
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Rendered conversation lines, oldest first
    pub lines: Vec<String>,
    /// Connection state as last reported
    pub connection: ConnectionState,
    /// Current display name
    pub username: String,
    /// Latest notice, if still showing
    pub notice: Option<DisplayNotice>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            connection: ConnectionState::Connecting,
            username: DEFAULT_USERNAME.to_string(),
            notice: None,
        }
    }
}

impl DisplayState {
    /// Create a display state for a session starting as `username`
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Apply a SessionMessage to update display state
    pub fn apply_message(&mut self, msg: SessionMessage) {
        match msg {
            SessionMessage::Line(line) => {
                self.lines.push(line);
            }
            SessionMessage::Notice { level, text } => {
                self.notice = Some(DisplayNotice {
                    level,
                    text,
                    remaining: NOTICE_DURATION,
                });
            }
            SessionMessage::State(state) => {
                self.connection = state;
            }
            SessionMessage::IdentityChanged(username) => {
                self.username = username;
            }
        }
    }

    /// Count down the notice timer
    pub fn update(&mut self, delta: Duration) {
        if let Some(notice) = &mut self.notice {
            notice.remaining = notice.remaining.saturating_sub(delta);
            if notice.remaining.is_zero() {
                self.notice = None;
            }
        }
    }

    /// Conversation lines wrapped to `width` columns
    pub fn wrapped_lines(&self, width: usize) -> Vec<String> {
        let width = width.max(1);
        self.lines
            .iter()
            .flat_map(|line| {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|part| part.into_owned())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Scroll position of the conversation log
///
/// Measured in lines from the bottom; 0 follows the latest line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
}

impl ScrollState {
    /// Lines scrolled up from the bottom
    pub fn offset(self) -> usize {
        self.offset
    }

    /// Whether the view follows new lines
    pub fn is_following(self) -> bool {
        self.offset == 0
    }

    /// Scroll towards older lines
    pub fn up(&mut self, lines: usize, total: usize, viewport: usize) {
        let max = total.saturating_sub(viewport);
        self.offset = (self.offset + lines).min(max);
    }

    /// Scroll towards newer lines
    pub fn down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    /// Jump back to the latest line
    pub fn to_bottom(&mut self) {
        self.offset = 0;
    }

    /// Keep the same lines in view after `added` lines were appended
    pub fn anchor(&mut self, added: usize, total: usize, viewport: usize) {
        if !self.is_following() {
            self.up(added, total, viewport);
        }
    }

    /// Index range of the lines in view
    pub fn window(self, total: usize, viewport: usize) -> std::ops::Range<usize> {
        let end = total.saturating_sub(self.offset);
        let start = end.saturating_sub(viewport);
        start..end
    }
}
