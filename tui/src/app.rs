//! Main Application
//!
//! The App struct manages the full-screen TUI as a thin display client:
//! - Event loop (keyboard, mouse, resize) multiplexed with relay events
//! - SessionManager for everything protocol related
//! - DisplayState for rendering
//!
//! The App:
//! 1. Turns key presses into input edits, commands and session calls
//! 2. Feeds transport events to the session
//! 3. Applies the resulting SessionMessages to DisplayState
//! 4. Renders based on DisplayState

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use papo_core::{
    create_transport, ClientConfig, Identity, NotifyLevel, SendOutcome, SessionManager,
    SessionMessage,
};

use crate::commands::{self, InputCommand};
use crate::display::{DisplayState, ScrollState};
use crate::theme::{self, DIM_GRAY, FADE_GRAY, PAPO_TEAL, USER_GREEN};

/// Input box height (lines) including the separator
const INPUT_HEIGHT: u16 = 4;

/// Redraw interval when nothing else happens (notice timers)
const FRAME_INTERVAL: Duration = Duration::from_millis(250);

/// Lines moved per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Shown when `/nome` is used without a name
const RENAME_USAGE: &str = "Uso: /nome <novo nome>";

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Session Integration ===
    /// The chat session (owns the relay connection)
    session: SessionManager,
    /// Messages from the session
    session_rx: mpsc::Receiver<SessionMessage>,
    /// Whether the transport has nothing more to report
    transport_done: bool,
    /// Display state derived from SessionMessages
    display: DisplayState,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Conversation scroll position
    scroll: ScrollState,

    // === Layout (from the last draw) ===
    /// Wrapped conversation lines
    total_lines: usize,
    /// Conversation viewport height
    viewport: usize,
    /// Conversation width used for wrapping
    log_width: usize,

    /// Last frame time (for notice timers)
    last_frame: Instant,
}

impl App {
    /// Create the app and start connecting to the relay in `config`
    pub async fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let transport = create_transport(config)?;
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let session =
            SessionManager::open(transport, Identity::new(config.username.clone()), tx).await;

        Ok(Self::with_session(session, rx))
    }

    /// Create the app around an already opened session
    pub fn with_session(session: SessionManager, session_rx: mpsc::Receiver<SessionMessage>) -> Self {
        let display = DisplayState::new(session.identity().username());

        Self {
            running: true,
            session,
            session_rx,
            transport_done: false,
            display,
            input_buffer: String::new(),
            scroll: ScrollState::default(),
            total_lines: 0,
            viewport: 0,
            log_width: 80,
            last_frame: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        // Async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI while connecting
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event).await,
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => {
                            tracing::info!("Terminal event stream ended");
                            self.running = false;
                        }
                    }
                }

                // Relay events
                event = self.session.next_transport_event(), if !self.transport_done => {
                    match event {
                        Some(event) => self.session.handle_transport_event(event).await,
                        None => {
                            tracing::debug!("Transport finished");
                            self.transport_done = true;
                        }
                    }
                }

                // Tick for timers
                () = tokio::time::sleep(FRAME_INTERVAL) => {}
            }

            self.process_session_messages();
            self.update();
            self.render(terminal)?;
        }

        self.session.close().await;
        Ok(())
    }

    /// Apply every pending message from the session
    pub fn process_session_messages(&mut self) {
        let before = self.display.lines.len();

        while let Ok(msg) = self.session_rx.try_recv() {
            self.display.apply_message(msg);
        }

        if self.display.lines.len() > before {
            let total = self.display.wrapped_lines(self.log_width).len();
            let added = total.saturating_sub(self.total_lines);
            self.scroll.anchor(added, total, self.viewport);
            self.total_lines = total;
        }
    }

    async fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Layout is recomputed on every draw
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "Terminal resized");
            }
            _ => {}
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Submit
            KeyCode::Enter => {
                self.submit().await;
            }

            // Typing
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }

            // Conversation scrolling
            KeyCode::PageUp => {
                let page = (self.viewport / 2).max(1);
                self.scroll.up(page, self.total_lines, self.viewport);
            }
            KeyCode::PageDown => {
                let page = (self.viewport / 2).max(1);
                self.scroll.down(page);
            }
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll.up(self.total_lines, self.total_lines, self.viewport);
            }
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.scroll.to_bottom();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll.up(WHEEL_LINES, self.total_lines, self.viewport);
            }
            MouseEventKind::ScrollDown => {
                self.scroll.down(WHEEL_LINES);
            }
            _ => {}
        }
    }

    /// Act on the input buffer
    async fn submit(&mut self) {
        match commands::parse(&self.input_buffer) {
            InputCommand::Quit => {
                self.input_buffer.clear();
                self.running = false;
            }
            InputCommand::Rename(None) => {
                self.input_buffer.clear();
                self.display.apply_message(SessionMessage::Notice {
                    level: NotifyLevel::Info,
                    text: RENAME_USAGE.to_string(),
                });
            }
            InputCommand::Rename(Some(name)) => {
                self.input_buffer.clear();
                self.session.rename_identity(Some(&name)).await;
            }
            InputCommand::Chat => {
                let outcome = self.session.send_chat_message(&mut self.input_buffer).await;
                if outcome == SendOutcome::Sent {
                    self.scroll.to_bottom();
                }
            }
        }
    }

    /// Update timers
    fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.display.update(delta);
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    /// Draw the whole UI into `frame`
    pub fn draw(&mut self, frame: &mut Frame) {
        let [log_area, notice_area, input_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_conversation(frame, log_area);
        self.draw_notice(frame, notice_area);
        self.draw_input(frame, input_area);
        self.draw_status(frame, status_area);
    }

    fn draw_conversation(&mut self, frame: &mut Frame, area: Rect) {
        self.log_width = usize::from(area.width.max(1));
        self.viewport = usize::from(area.height);

        let lines = self.display.wrapped_lines(self.log_width);
        self.total_lines = lines.len();

        let range = self.scroll.window(lines.len(), self.viewport);
        let has_content_above = range.start > 0;
        let has_content_below = !self.scroll.is_following();
        let last = range.len().saturating_sub(1);

        let visible: Vec<Line> = lines[range]
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let faded = (has_content_above && i == 0) || (has_content_below && i == last);
                let style = if faded {
                    Style::default().fg(FADE_GRAY)
                } else {
                    Style::default()
                };
                Line::styled(text.clone(), style)
            })
            .collect();

        frame.render_widget(Paragraph::new(visible), area);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect) {
        if let Some(notice) = &self.display.notice {
            let style = Style::default().fg(theme::notice_color(notice.level));
            frame.render_widget(
                Paragraph::new(Line::styled(notice.text.clone(), style)),
                area,
            );
        }
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect) {
        let width = usize::from(area.width);
        let text_height = usize::from(area.height.saturating_sub(1));
        if width < 5 || text_height < 1 {
            return;
        }

        let mut lines = vec![Line::styled(
            "─".repeat(width),
            Style::default().fg(DIM_GRAY),
        )];

        let full_input = format!("Você: {}_", self.input_buffer);
        let wrapped = textwrap::wrap(&full_input, width.saturating_sub(1));
        let skip = wrapped.len().saturating_sub(text_height);
        lines.extend(
            wrapped
                .into_iter()
                .skip(skip)
                .map(|part| Line::styled(part.into_owned(), Style::default().fg(USER_GREEN))),
        );

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let connection = self.display.connection;

        let scroll_info = if self.scroll.is_following() {
            String::new()
        } else {
            format!(" [^{} linhas]", self.scroll.offset())
        };

        let status = Line::from(vec![
            Span::styled(
                " papo ",
                Style::default().fg(PAPO_TEAL).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("● {}", connection.description()),
                Style::default().fg(theme::connection_color(connection)),
            ),
            Span::styled(
                format!(
                    " | {} | /nome <nome> · Esc sair · PgUp/PgDn rolar{scroll_info}",
                    self.display.username
                ),
                Style::default().fg(DIM_GRAY),
            ),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Current input buffer
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// The chat session
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Mutable access to the session (drive transport events from tests or embedders)
    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }
}
