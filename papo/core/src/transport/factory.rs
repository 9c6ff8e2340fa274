//! Transport Factory
//!
//! Builds the transport a surface should use from configuration.

use crate::config::ClientConfig;

use super::traits::{RelayTransport, TransportError};
use super::websocket::WebSocketTransport;

/// Create the relay transport described by `config`
///
/// The transport is returned unconnected; the session opens it.
///
/// # Errors
///
/// Returns `TransportError::InvalidState` if the configuration does not
/// validate (for example a non-WebSocket relay URL).
pub fn create_transport(config: &ClientConfig) -> Result<Box<dyn RelayTransport>, TransportError> {
    config
        .validate()
        .map_err(|e| TransportError::InvalidState(e.to_string()))?;

    Ok(Box::new(WebSocketTransport::from_config(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_websocket_transport() {
        let config = ClientConfig::default();
        let transport = create_transport(&config).unwrap();

        // Created but not connected
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let config = ClientConfig {
            relay_url: "localhost:3000".to_string(),
            ..Default::default()
        };

        match create_transport(&config) {
            Err(TransportError::InvalidState(msg)) => assert!(msg.contains("ws://")),
            Err(other) => panic!("Expected InvalidState error, got: {other}"),
            Ok(_) => panic!("Expected error for non-WebSocket URL"),
        }
    }
}
