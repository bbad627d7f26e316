//! Message repository trait definition.
//!
//! Defines the storage interface for the append-only direct message
//! log. The infrastructure layer (syrup-infra) implements this trait
//! with SQLite persistence.
//!
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use syrup_types::error::RepositoryError;
use syrup_types::message::Message;
use syrup_types::user::UserId;

/// Repository trait for direct message persistence.
///
/// A conversation is the unordered pair of users appearing as sender
/// and receiver; implementations key it by the canonical
/// `conversation_key` stored with every row. Within a conversation,
/// all reads honor the total order `(sent_at, id)` ascending.
pub trait MessageRepository: Send + Sync {
    /// Append a message to the log. The implementation assigns the id,
    /// timestamp, and conversation key, and returns the full stored
    /// record. The write is atomic: on failure nothing is visible.
    fn save(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// All messages exchanged between `a` and `b`, ascending by
    /// `(sent_at, id)`. Symmetric in its arguments.
    fn history(
        &self,
        a: UserId,
        b: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// The most recent message between `a` and `b` by the same order,
    /// or `None` for an empty conversation.
    fn last_message(
        &self,
        a: UserId,
        b: UserId,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Every distinct user that has exchanged at least one message
    /// with `user`.
    fn companions_of(
        &self,
        user: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<UserId>, RepositoryError>> + Send;
}
