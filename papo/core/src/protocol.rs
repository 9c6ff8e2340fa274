//! Wire Codec
//!
//! Maps between typed values and the relay's JSON text frames. Every frame is
//! a JSON object tagged by a `type` field:
//!
//! ```text
//! client -> relay   {"type":"join_chat","username":"Ana"}
//!                   {"type":"send_message","text":"oi"}
//! relay -> client   {"type":"message","username":"Bob","text":"oi"}
//!                   {"type":"user_joined","username":"Bob"}
//!                   {"type":"user_left","username":"Bob"}
//!                   {"type":"error","message":"..."}
//! ```
//!
//! Decoding is total: anything the client does not understand becomes
//! [`RelayEvent::Unknown`] carrying the raw frame, so callers never see a
//! decode error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Intents sent from this client to the relay
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientIntent {
    /// Announce (or re-announce) the display name used by this client
    JoinChat {
        /// Display name
        username: String,
    },
    /// Post a chat message under the last announced name
    SendMessage {
        /// Message body, already trimmed
        text: String,
    },
}

impl ClientIntent {
    /// Wire tag for this intent
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinChat { .. } => "join_chat",
            Self::SendMessage { .. } => "send_message",
        }
    }
}

/// Events received from the relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayEvent {
    /// A chat line posted by someone (possibly this client)
    Message {
        /// Author's display name
        username: String,
        /// Message body
        text: String,
    },
    /// Someone announced themselves
    UserJoined {
        /// Display name
        username: String,
    },
    /// Someone disconnected
    UserLeft {
        /// Display name
        username: String,
    },
    /// The relay rejected something this client did
    Error {
        /// Relay-provided description
        message: String,
    },
    /// Unrecognized `type`, missing fields, or not JSON at all
    Unknown {
        /// The frame exactly as received
        raw: String,
    },
}

impl RelayEvent {
    /// Whether this event came from a frame the client could not interpret
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }
}

/// Renders the event as the single line shown in the conversation log
impl fmt::Display for RelayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message { username, text } => write!(f, "{username}: {text}"),
            Self::UserJoined { username } => write!(f, "{username} entrou na conversa!"),
            Self::UserLeft { username } => write!(f, "{username} saiu da conversa."),
            Self::Error { message } => write!(f, "Erro: {message}"),
            Self::Unknown { raw } => write!(f, "[Tipo desconhecido]: {raw}"),
        }
    }
}

/// The closed set of frames the relay is known to send.
///
/// Kept private: the public surface is [`RelayEvent`], which adds the
/// `Unknown` fallback serde cannot express for internally tagged enums.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Message { username: String, text: String },
    UserJoined { username: String },
    UserLeft { username: String },
    Error { message: String },
}

impl From<WireEvent> for RelayEvent {
    fn from(wire: WireEvent) -> Self {
        match wire {
            WireEvent::Message { username, text } => Self::Message { username, text },
            WireEvent::UserJoined { username } => Self::UserJoined { username },
            WireEvent::UserLeft { username } => Self::UserLeft { username },
            WireEvent::Error { message } => Self::Error { message },
        }
    }
}

/// Errors produced while encoding an outbound intent
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The serializer refused the value
    #[error("failed to encode {kind} intent: {source}")]
    Encode {
        /// Wire tag of the intent being encoded
        kind: &'static str,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },
}

/// Encode an intent as a JSON text frame
///
/// # Errors
///
/// Returns [`CodecError::Encode`] only if serialization itself fails, which
/// cannot happen for the string-only intents defined here.
pub fn encode(intent: &ClientIntent) -> Result<String, CodecError> {
    serde_json::to_string(intent).map_err(|source| CodecError::Encode {
        kind: intent.kind(),
        source,
    })
}

/// Decode a text frame from the relay
///
/// Never fails: malformed or unrecognized input degrades to
/// [`RelayEvent::Unknown`] with the original text.
#[must_use]
pub fn decode(raw: &str) -> RelayEvent {
    match serde_json::from_str::<WireEvent>(raw) {
        Ok(wire) => wire.into(),
        Err(e) => {
            tracing::debug!(error = %e, "Unrecognized relay frame");
            RelayEvent::Unknown {
                raw: raw.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_encode_join_chat_fields() {
        let frame = encode(&ClientIntent::JoinChat {
            username: "Guest".into(),
        })
        .unwrap();

        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({"type": "join_chat", "username": "Guest"}));
    }

    #[test]
    fn test_encode_send_message_fields() {
        let frame = encode(&ClientIntent::SendMessage {
            text: "olá \"mundo\"".into(),
        })
        .unwrap();

        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({"type": "send_message", "text": "olá \"mundo\""}));
    }

    #[test]
    fn test_decode_known_types() {
        assert_eq!(
            decode(r#"{"type":"message","username":"Bob","text":"hi"}"#),
            RelayEvent::Message {
                username: "Bob".into(),
                text: "hi".into()
            }
        );
        assert_eq!(
            decode(r#"{"type":"user_joined","username":"Bob"}"#),
            RelayEvent::UserJoined {
                username: "Bob".into()
            }
        );
        assert_eq!(
            decode(r#"{"type":"user_left","username":"Bob"}"#),
            RelayEvent::UserLeft {
                username: "Bob".into()
            }
        );
        assert_eq!(
            decode(r#"{"type":"error","message":"nome em uso"}"#),
            RelayEvent::Error {
                message: "nome em uso".into()
            }
        );
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let event = decode(r#"{"type":"user_left","username":"Bob","at":12}"#);
        assert_eq!(
            event,
            RelayEvent::UserLeft {
                username: "Bob".into()
            }
        );
    }

    #[test]
    fn test_decode_unknown_type_keeps_raw() {
        let raw = r#"{"type":"typing","username":"Bob"}"#;
        assert_eq!(decode(raw), RelayEvent::Unknown { raw: raw.into() });
    }

    #[test]
    fn test_decode_malformed_input() {
        for raw in ["not json", "", "[]", "{}", r#"{"type":"message","username":"Bob"}"#] {
            let event = decode(raw);
            assert!(event.is_unknown(), "expected Unknown for {raw:?}");
            assert_eq!(event, RelayEvent::Unknown { raw: raw.into() });
        }
    }

    #[test]
    fn test_display_lines() {
        let cases = [
            (
                RelayEvent::Message {
                    username: "Bob".into(),
                    text: "hi".into(),
                },
                "Bob: hi",
            ),
            (
                RelayEvent::UserJoined {
                    username: "Bob".into(),
                },
                "Bob entrou na conversa!",
            ),
            (
                RelayEvent::UserLeft {
                    username: "Bob".into(),
                },
                "Bob saiu da conversa.",
            ),
            (
                RelayEvent::Error {
                    message: "boom".into(),
                },
                "Erro: boom",
            ),
            (
                RelayEvent::Unknown {
                    raw: "not json".into(),
                },
                "[Tipo desconhecido]: not json",
            ),
        ];

        for (event, line) in cases {
            assert_eq!(event.to_string(), line);
        }
    }

    /// A relay echoing the intent's fields back under the matching inbound tag
    /// decodes to an event of the same shape.
    #[test]
    fn test_echoed_fields_round_trip_shape() {
        let join = encode(&ClientIntent::JoinChat {
            username: "Alice".into(),
        })
        .unwrap();
        let mut echoed: Value = serde_json::from_str(&join).unwrap();
        echoed["type"] = json!("user_joined");
        assert_eq!(
            decode(&echoed.to_string()),
            RelayEvent::UserJoined {
                username: "Alice".into()
            }
        );

        let send = encode(&ClientIntent::SendMessage { text: "oi".into() }).unwrap();
        let mut echoed: Value = serde_json::from_str(&send).unwrap();
        echoed["type"] = json!("message");
        echoed["username"] = json!("Alice");
        assert_eq!(
            decode(&echoed.to_string()),
            RelayEvent::Message {
                username: "Alice".into(),
                text: "oi".into()
            }
        );
    }
}
