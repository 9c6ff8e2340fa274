//! Line Mode
//!
//! Chat without a full-screen terminal: input lines come from a reader
//! (stdin), rendered conversation lines go to one writer (stdout) and
//! everything else (notices, connection changes) to another (stderr).
//! Used with `--plain` or when stdin/stdout is not a TTY.
//!
//! Commands are the same as in the TUI. Input is only read once the
//! connection is open (or has failed), so piped input is not thrown away
//! while connecting. End of input leaves the chat.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;

use papo_core::{
    create_transport, ClientConfig, ConnectionState, Identity, SessionManager, SessionMessage,
};

use crate::commands::{self, InputCommand};

/// Line-mode surface over a reader and two writers
pub struct PlainSurface<R, O, E> {
    session: SessionManager,
    session_rx: mpsc::Receiver<SessionMessage>,
    input: Lines<R>,
    out: O,
    diag: E,
}

/// Run line mode on stdin/stdout/stderr
pub async fn run(config: &ClientConfig) -> anyhow::Result<()> {
    let transport = create_transport(config)?;
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let session = SessionManager::open(transport, Identity::new(config.username.clone()), tx).await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut surface = PlainSurface::new(session, rx, stdin, tokio::io::stdout(), tokio::io::stderr());
    surface.run().await
}

impl<R, O, E> PlainSurface<R, O, E>
where
    R: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    /// Create a surface around an already opened session
    pub fn new(
        session: SessionManager,
        session_rx: mpsc::Receiver<SessionMessage>,
        input: R,
        out: O,
        diag: E,
    ) -> Self {
        Self {
            session,
            session_rx,
            input: input.lines(),
            out,
            diag,
        }
    }

    /// Process relay events and input lines until input ends or `/sair`
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut transport_done = false;

        loop {
            // Input waits for the connection attempt to settle
            let settled = transport_done || self.session.state() != ConnectionState::Connecting;

            tokio::select! {
                // Relay first so queued events are shown before reading on
                biased;

                event = self.session.next_transport_event(), if !transport_done => {
                    match event {
                        Some(event) => self.session.handle_transport_event(event).await,
                        None => transport_done = true,
                    }
                }

                line = self.input.next_line(), if settled => {
                    match line {
                        Ok(Some(line)) => {
                            if !self.submit(&line).await {
                                break;
                            }
                        }
                        Ok(None) => {
                            tracing::debug!("End of input");
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Skipping unreadable input line");
                        }
                    }
                }
            }

            self.flush_session_messages().await?;
        }

        self.session.close().await;
        self.flush_session_messages().await?;
        Ok(())
    }

    /// Act on one input line; returns `false` to leave
    async fn submit(&mut self, line: &str) -> bool {
        match commands::parse(line) {
            InputCommand::Quit => false,
            InputCommand::Rename(name) => {
                self.session.rename_identity(name.as_deref()).await;
                true
            }
            InputCommand::Chat => {
                let mut input = line.to_string();
                self.session.send_chat_message(&mut input).await;
                true
            }
        }
    }

    /// Write every pending session message
    async fn flush_session_messages(&mut self) -> std::io::Result<()> {
        while let Ok(msg) = self.session_rx.try_recv() {
            match msg {
                SessionMessage::Line(text) => {
                    self.out.write_all(format!("{text}\n").as_bytes()).await?;
                }
                SessionMessage::Notice { text, .. } => {
                    self.diag.write_all(format!("{text}\n").as_bytes()).await?;
                }
                SessionMessage::State(state) => {
                    let text = state_line(state);
                    self.diag.write_all(format!("{text}\n").as_bytes()).await?;
                }
                SessionMessage::IdentityChanged(name) => {
                    self.diag
                        .write_all(format!("* Agora você é {name}\n").as_bytes())
                        .await?;
                }
            }
        }

        self.out.flush().await?;
        self.diag.flush().await
    }

    /// Recover the writers (inspect output in tests)
    pub fn into_writers(self) -> (O, E) {
        (self.out, self.diag)
    }
}

fn state_line(state: ConnectionState) -> String {
    format!("* {}", state.description())
}
