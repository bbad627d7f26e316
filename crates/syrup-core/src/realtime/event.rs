//! Realtime wire protocol.
//!
//! Events travel as JSON text frames tagged by an `event` field.
//! Unknown or malformed inbound frames are answered with an `error`
//! event and otherwise ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use syrup_types::message::Message;
use syrup_types::user::UserId;

/// Inbound event from a realtime client.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Authenticate the connection with an access token.
    Join { token: String },
    /// Send a direct message. Only processed once authenticated; the
    /// sender is resolved server-side, never from the payload.
    Message { receiver_id: UserId, text: String },
    /// Ephemeral typing indicator; never persisted.
    Typing { receiver_id: UserId, is_typing: bool },
}

/// Outbound event pushed to realtime clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Acknowledges a successful join.
    Joined { user_id: UserId },
    /// The canonical persisted message, including the server-assigned
    /// id and timestamp -- never a client-echoed guess.
    Message {
        id: i64,
        sender_id: UserId,
        receiver_id: UserId,
        text: String,
        #[serde(rename = "timestamp")]
        sent_at: DateTime<Utc>,
    },
    Typing { sender_id: UserId, is_typing: bool },
    /// Explicit rejection; clients never get a fabricated success.
    Error { code: String, message: String },
}

impl ServerEvent {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ServerEvent::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<&Message> for ServerEvent {
    fn from(msg: &Message) -> Self {
        ServerEvent::Message {
            id: msg.id,
            sender_id: msg.sender_id,
            receiver_id: msg.receiver_id,
            text: msg.text.clone(),
            sent_at: msg.sent_at,
        }
    }
}
