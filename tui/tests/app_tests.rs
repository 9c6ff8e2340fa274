//! Integration Tests for the full-screen App
//!
//! The App is driven with synthetic key events against an in-process relay,
//! and rendered into ratatui's `TestBackend`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use papo_core::{
    ConnectionState, Identity, InProcessTransport, NotifyLevel, RelayHandle, SessionManager,
    NOT_READY_NOTICE,
};
use papo_tui::App;

// ============================================================================
// Helpers
// ============================================================================

async fn connecting_app() -> (App, RelayHandle) {
    let (transport, relay) = InProcessTransport::new_pair();
    let (tx, rx) = mpsc::channel(100);
    let session = SessionManager::open(Box::new(transport), Identity::default(), tx).await;

    (App::with_session(session, rx), relay)
}

async fn open_app() -> (App, RelayHandle) {
    let (mut app, mut relay) = connecting_app().await;
    assert!(app.session_mut().process_next_event().await);
    app.process_session_messages();
    relay.drain_sent();

    (app, relay)
}

async fn type_line(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .await;
    }
    app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
        .await;
    app.process_session_messages();
}

fn screen_text(app: &mut App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();

    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(usize::from(width))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect()
}

// ============================================================================
// Input
// ============================================================================

#[tokio::test]
async fn test_enter_sends_and_clears_input() {
    let (mut app, mut relay) = open_app().await;

    type_line(&mut app, "oi gente").await;

    assert_eq!(
        relay.drain_sent(),
        vec![r#"{"type":"send_message","text":"oi gente"}"#.to_string()]
    );
    assert_eq!(app.input(), "");
}

#[tokio::test]
async fn test_send_while_connecting_shows_notice() {
    let (mut app, mut relay) = connecting_app().await;

    type_line(&mut app, "cedo demais").await;

    assert!(relay.drain_sent().is_empty());
    assert_eq!(app.input(), "cedo demais");

    let notice = app.display().notice.clone().expect("notice shown");
    assert_eq!(notice.level, NotifyLevel::Warning);
    assert_eq!(notice.text, NOT_READY_NOTICE);
}

#[tokio::test]
async fn test_backspace_edits_input() {
    let (mut app, _relay) = open_app().await;

    for c in "olá".chars() {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .await;
    }
    app.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
        .await;

    assert_eq!(app.input(), "ol");
}

// ============================================================================
// Commands
// ============================================================================

#[tokio::test]
async fn test_rename_command() {
    let (mut app, mut relay) = open_app().await;

    type_line(&mut app, "/nome Alice").await;

    assert_eq!(
        relay.drain_sent(),
        vec![r#"{"type":"join_chat","username":"Alice"}"#.to_string()]
    );
    assert_eq!(app.display().username, "Alice");
    assert_eq!(app.input(), "");
}

#[tokio::test]
async fn test_rename_without_name_shows_usage() {
    let (mut app, mut relay) = open_app().await;

    type_line(&mut app, "/nome").await;

    assert!(relay.drain_sent().is_empty());
    assert_eq!(app.display().username, "Guest");
    assert!(app.display().notice.is_some());
}

#[tokio::test]
async fn test_quit_command_and_escape() {
    let (mut app, _relay) = open_app().await;
    type_line(&mut app, "/sair").await;
    assert!(!app.is_running());

    let (mut app, _relay) = open_app().await;
    app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
        .await;
    assert!(!app.is_running());

    let (mut app, _relay) = open_app().await;
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
        .await;
    assert!(!app.is_running());
}

// ============================================================================
// Relay events
// ============================================================================

#[tokio::test]
async fn test_relay_lines_and_close_reach_display() {
    let (mut app, relay) = open_app().await;
    assert_eq!(app.display().connection, ConnectionState::Open);

    relay
        .push_frame(r#"{"type":"user_joined","username":"Bob"}"#)
        .await;
    relay.close(None).await;
    while app.session().state() == ConnectionState::Open {
        app.session_mut().process_next_event().await;
    }
    app.process_session_messages();

    assert_eq!(app.display().lines, vec!["Bob entrou na conversa!".to_string()]);
    assert_eq!(app.display().connection, ConnectionState::Closed);
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_status_bar_shows_state_and_name() {
    let (mut app, _relay) = connecting_app().await;

    let screen = screen_text(&mut app, 80, 10);
    let status = screen.last().unwrap();

    assert!(status.contains("Conectando..."), "status: {status}");
    assert!(status.contains("Guest"), "status: {status}");
}

#[tokio::test]
async fn test_log_follows_latest_line() {
    let (mut app, relay) = open_app().await;

    for i in 0..20 {
        relay
            .push_frame(format!(r#"{{"type":"message","username":"Bob","text":"linha {i}"}}"#))
            .await;
        app.session_mut().process_next_event().await;
    }
    app.process_session_messages();

    // 10 rows: 4 log, 1 notice, 4 input, 1 status
    let screen = screen_text(&mut app, 40, 10);

    assert!(screen[3].starts_with("Bob: linha 19"), "screen: {screen:#?}");
    assert!(screen[0].starts_with("Bob: linha 16"), "screen: {screen:#?}");
}
