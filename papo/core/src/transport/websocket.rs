//! WebSocket Transport
//!
//! Client-side WebSocket connection to the relay. `connect` spawns a
//! connection task that performs the handshake and then splits the stream:
//! the connection task keeps reading frames into [`TransportEvent`]s while a
//! write task drains the outbound channel into the socket.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::ClientConfig;

use super::traits::{RelayTransport, TransportError, TransportEvent};

type RelayStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client transport
pub struct WebSocketTransport {
    /// Relay endpoint (`ws://` or `wss://`)
    url: String,
    /// How long the TCP + WebSocket handshake may take
    connect_timeout: Duration,
    /// Capacity of the inbound and outbound channels
    capacity: usize,
    /// Events produced by the connection task
    event_rx: Option<mpsc::Receiver<TransportEvent>>,
    /// Frames consumed by the write task
    frame_tx: Option<mpsc::Sender<String>>,
    /// Whether the handshake completed and the socket is still up
    connected: Arc<AtomicBool>,
    /// Set by `close`; a handshake finishing afterwards is discarded
    closing: Arc<AtomicBool>,
}

impl WebSocketTransport {
    /// Create a transport for `url`; nothing is opened until [`connect`](RelayTransport::connect)
    pub fn new(url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            connect_timeout,
            capacity: 100,
            event_rx: None,
            frame_tx: None,
            connected: Arc::new(AtomicBool::new(false)),
            closing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a transport from client configuration
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut transport = Self::new(config.relay_url.clone(), config.connect_timeout());
        transport.capacity = config.channel_capacity.max(1);
        transport
    }

    /// Relay endpoint
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for WebSocketTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        if self.event_rx.is_some() {
            return Err(TransportError::InvalidState(
                "Connection already started".to_string(),
            ));
        }

        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>(self.capacity);
        let (frame_tx, frame_rx) = mpsc::channel::<String>(self.capacity);

        tokio::spawn(run_connection(
            self.url.clone(),
            self.connect_timeout,
            Arc::clone(&self.connected),
            Arc::clone(&self.closing),
            event_tx,
            frame_rx,
        ));

        self.event_rx = Some(event_rx);
        self.frame_tx = Some(frame_tx);

        tracing::info!(url = %self.url, "Connecting to relay");
        Ok(())
    }

    async fn send(&self, frame: String) -> Result<(), TransportError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidState("Not connected".to_string()));
        }

        match self.frame_tx {
            Some(ref tx) => tx
                .send(frame)
                .await
                .map_err(|_| TransportError::SendFailed("Channel closed".to_string())),
            None => Err(TransportError::InvalidState("Not connected".to_string())),
        }
    }

    async fn recv(&mut self) -> Option<TransportEvent> {
        self.event_rx.as_mut()?.recv().await
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.closing.store(true, Ordering::SeqCst);
        // Dropping the sender lets the write task send a close frame
        self.frame_tx = None;
        self.connected.store(false, Ordering::SeqCst);

        tracing::info!(url = %self.url, "Closing relay connection");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Handshake with the relay, bounded by `timeout`
async fn handshake(url: &str, timeout: Duration) -> Result<RelayStream, TransportError> {
    let (stream, _response) = tokio::time::timeout(timeout, connect_async(url))
        .await
        .map_err(|_| {
            TransportError::Timeout(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
        })?
        .map_err(|e| TransportError::ConnectionFailed(format!("Failed to connect to {url}: {e}")))?;

    Ok(stream)
}

/// Owns the socket for the lifetime of one connection
async fn run_connection(
    url: String,
    timeout: Duration,
    connected: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
    event_tx: mpsc::Sender<TransportEvent>,
    mut frame_rx: mpsc::Receiver<String>,
) {
    let mut stream = match handshake(&url, timeout).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(error = %e, url = %url, "Relay connection failed");
            let _ = event_tx.send(TransportEvent::Error(e.to_string())).await;
            return;
        }
    };

    if closing.load(Ordering::SeqCst) {
        tracing::debug!(url = %url, "Closed while connecting, dropping handshake");
        let _ = stream.close(None).await;
        return;
    }

    let (mut write, mut read) = stream.split();

    connected.store(true, Ordering::SeqCst);
    tracing::info!(url = %url, "Connected to relay");
    if event_tx.send(TransportEvent::Opened).await.is_err() {
        tracing::debug!("Event receiver dropped before open");
        connected.store(false, Ordering::SeqCst);
        return;
    }

    // Write task: frame_rx -> socket
    let connected_write = Arc::clone(&connected);
    tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
            if let Err(e) = write.send(Message::Text(frame.into())).await {
                tracing::warn!(error = %e, "WebSocket write error");
                break;
            }
        }

        // Sender dropped (close requested) or the socket broke
        let _ = write.close().await;
        connected_write.store(false, Ordering::SeqCst);
    });

    // Read loop: socket -> event_tx
    let last_event = loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                if event_tx
                    .send(TransportEvent::Frame(text.to_string()))
                    .await
                    .is_err()
                {
                    tracing::debug!("Event receiver dropped");
                    break None;
                }
            }
            Some(Ok(Message::Binary(bytes))) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                if event_tx.send(TransportEvent::Frame(text)).await.is_err() {
                    tracing::debug!("Event receiver dropped");
                    break None;
                }
            }
            Some(Ok(Message::Close(frame))) => {
                let reason = frame
                    .map(|f| f.reason.to_string())
                    .filter(|r| !r.is_empty());
                tracing::debug!(?reason, "Relay sent close frame");
                break Some(TransportEvent::Closed { reason });
            }
            // Ping/pong are answered by tungstenite itself
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!(error = %e, "WebSocket read error");
                break Some(TransportEvent::Error(e.to_string()));
            }
            None => {
                tracing::debug!("Connection closed by relay");
                break Some(TransportEvent::Closed { reason: None });
            }
        }
    };

    connected.store(false, Ordering::SeqCst);
    if let Some(event) = last_event {
        let _ = event_tx.send(event).await;
    }
    tracing::info!(url = %url, "Disconnected from relay");
}
