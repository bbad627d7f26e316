//! Derives a user's chat list from the message log.
//!
//! Conversations have no table of their own; a companion appears in
//! the list exactly when at least one message has been exchanged with
//! them, and disappears from consideration only if their account is
//! gone.

use std::sync::Arc;

use tracing::{debug, warn};

use syrup_types::chat::ChatPreview;
use syrup_types::error::RepositoryError;
use syrup_types::user::UserId;

use crate::repository::{MessageRepository, UserRepository};

/// Builds chat previews for the conversation list endpoint.
pub struct ConversationAggregator<M: MessageRepository, U: UserRepository> {
    messages: Arc<M>,
    users: Arc<U>,
}

impl<M: MessageRepository, U: UserRepository> ConversationAggregator<M, U> {
    pub fn new(messages: Arc<M>, users: Arc<U>) -> Self {
        Self { messages, users }
    }

    /// One preview per companion of `user`, newest conversation first.
    ///
    /// Ties on the last message timestamp break by ascending companion
    /// id so the ordering is deterministic. Companions whose account no
    /// longer exists are skipped rather than failing the whole list.
    pub async fn chats_of(&self, user: UserId) -> Result<Vec<ChatPreview>, RepositoryError> {
        let companions = self.messages.companions_of(user).await?;
        debug!(user_id = user, companions = companions.len(), "building chat list");

        let mut previews = Vec::with_capacity(companions.len());
        for companion_id in companions {
            let Some(last) = self.messages.last_message(user, companion_id).await? else {
                continue;
            };
            let Some(companion) = self.users.get_by_id(companion_id).await? else {
                warn!(companion_id, "skipping chat with missing user account");
                continue;
            };
            previews.push(ChatPreview {
                companion_id,
                companion_login: companion.login,
                companion_avatar_url: companion.avatar_url,
                last_message: last.text,
                last_message_at: last.sent_at,
                from_me: last.sender_id == user,
            });
        }

        previews.sort_by(|a, b| {
            b.last_message_at
                .cmp(&a.last_message_at)
                .then(a.companion_id.cmp(&b.companion_id))
        });
        Ok(previews)
    }
}
