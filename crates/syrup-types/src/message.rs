//! Message types for the append-only direct message log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Server-assigned, monotonically increasing message identifier.
pub type MessageId = i64;

/// A persisted direct message between two users.
///
/// Immutable once stored. Within a conversation, messages are totally
/// ordered by `(sent_at, id)` with the id as tie-break; every read
/// path returns them in that order ascending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    /// Canonical conversation identifier, stored with the row so
    /// history queries never recompute the pair ordering.
    pub conversation_key: String,
}

/// Canonical conversation key for an unordered pair of users.
///
/// Independent of who initiated the conversation: the smaller id
/// always comes first, so `conversation_key(a, b) == conversation_key(b, a)`.
pub fn conversation_key(a: UserId, b: UserId) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("chat:{lo}:{hi}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_key_is_symmetric() {
        assert_eq!(conversation_key(1, 2), conversation_key(2, 1));
        assert_eq!(conversation_key(1, 2), "chat:1:2");
    }

    #[test]
    fn conversation_key_with_self() {
        assert_eq!(conversation_key(5, 5), "chat:5:5");
    }

    #[test]
    fn message_serde_round_trip() {
        let msg = Message {
            id: 1,
            sender_id: 1,
            receiver_id: 2,
            text: "hi".to_string(),
            sent_at: Utc::now(),
            conversation_key: conversation_key(1, 2),
        };

        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
