//! Derived chat-list types.
//!
//! A conversation is not stored as its own entity; it is derived from
//! the message log as the unordered pair of users that have exchanged
//! at least one message. `ChatPreview` is what the chat list endpoint
//! returns for each such pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// One entry in a user's chat list: the companion plus the most
/// recent message exchanged with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatPreview {
    pub companion_id: UserId,
    pub companion_login: String,
    pub companion_avatar_url: Option<String>,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    /// Whether the requesting user sent the last message.
    pub from_me: bool,
}
