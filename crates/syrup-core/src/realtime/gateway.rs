//! Realtime chat protocol handler.
//!
//! Each connection moves through Unauthenticated -> Authenticated ->
//! Closed. The gateway authenticates joins through the registry,
//! persists messages before broadcasting them, and answers every
//! rejected event with an explicit `error` frame.
//!
//! The sender of every action is resolved from the registry's
//! connection-to-identity binding. Payload fields never name the
//! sender.

use std::sync::Arc;

use tracing::{info, warn};

use syrup_types::error::{ChatError, RegistryError};
use syrup_types::user::UserId;

use crate::realtime::event::{ClientEvent, ServerEvent};
use crate::realtime::registry::{ConnectionId, ConnectionRegistry, room_for};
use crate::repository::{MessageRepository, UserRepository};

/// Stable machine-readable error codes carried by outbound `error`
/// events. The HTTP layer uses the same codes in its envelope.
pub mod codes {
    pub const AUTHENTICATION_ERROR: &str = "AUTHENTICATION_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const PERSISTENCE_ERROR: &str = "PERSISTENCE_ERROR";
}

/// Routes realtime events between the registry and the message log.
pub struct ChatGateway<M: MessageRepository, U: UserRepository> {
    registry: Arc<ConnectionRegistry>,
    messages: Arc<M>,
    users: Arc<U>,
}

impl<M: MessageRepository, U: UserRepository> ChatGateway<M, U> {
    pub fn new(registry: Arc<ConnectionRegistry>, messages: Arc<M>, users: Arc<U>) -> Self {
        Self {
            registry,
            messages,
            users,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Handle one inbound event for a connection.
    pub async fn handle_event(&self, conn_id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::Join { token } => self.handle_join(conn_id, &token),
            ClientEvent::Message { receiver_id, text } => {
                if let Err(e) = self.handle_message(conn_id, receiver_id, &text).await {
                    self.reject(conn_id, &e);
                }
            }
            ClientEvent::Typing {
                receiver_id,
                is_typing,
            } => {
                if let Err(e) = self.handle_typing(conn_id, receiver_id, is_typing) {
                    self.reject(conn_id, &e);
                }
            }
        }
    }

    /// Guaranteed-cleanup path: every disconnect, graceful or abrupt,
    /// funnels through here exactly once per connection.
    pub fn handle_disconnect(&self, conn_id: ConnectionId) {
        self.registry.leave(conn_id);
    }

    fn handle_join(&self, conn_id: ConnectionId, token: &str) {
        match self.registry.join(conn_id, token) {
            Ok(user_id) => {
                self.registry.send_to(conn_id, ServerEvent::Joined { user_id });
            }
            Err(e) => {
                warn!(%conn_id, error = %e, "realtime join rejected");
                let code = match e {
                    RegistryError::Authentication(_) => codes::AUTHENTICATION_ERROR,
                    RegistryError::UnknownConnection | RegistryError::AlreadyJoined => {
                        codes::VALIDATION_ERROR
                    }
                };
                self.registry
                    .send_to(conn_id, ServerEvent::error(code, e.to_string()));
            }
        }
    }

    async fn handle_message(
        &self,
        conn_id: ConnectionId,
        receiver_id: UserId,
        text: &str,
    ) -> Result<(), ChatError> {
        let sender_id = self
            .registry
            .identity_of(conn_id)
            .ok_or(ChatError::Unauthenticated)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::Validation("message text is empty".to_string()));
        }

        if self.users.get_by_id(receiver_id).await?.is_none() {
            return Err(ChatError::ReceiverNotFound);
        }

        // Persist first: anyone who sees the broadcast is guaranteed a
        // subsequent history read will include the message.
        let message = self.messages.save(sender_id, receiver_id, text).await?;
        info!(
            message_id = message.id,
            sender_id, receiver_id, "message persisted"
        );

        let event = ServerEvent::from(&message);
        self.registry.broadcast(&room_for(sender_id), &event);
        if sender_id != receiver_id {
            self.registry.broadcast(&room_for(receiver_id), &event);
        }
        Ok(())
    }

    fn handle_typing(
        &self,
        conn_id: ConnectionId,
        receiver_id: UserId,
        is_typing: bool,
    ) -> Result<(), ChatError> {
        let sender_id = self
            .registry
            .identity_of(conn_id)
            .ok_or(ChatError::Unauthenticated)?;

        // Ephemeral: receiver's room only, nothing persisted.
        self.registry.broadcast(
            &room_for(receiver_id),
            &ServerEvent::Typing {
                sender_id,
                is_typing,
            },
        );
        Ok(())
    }

    fn reject(&self, conn_id: ConnectionId, error: &ChatError) {
        warn!(%conn_id, error = %error, "realtime event rejected");
        let code = match error {
            ChatError::Unauthenticated => codes::AUTHENTICATION_ERROR,
            ChatError::Validation(_) => codes::VALIDATION_ERROR,
            ChatError::ReceiverNotFound => codes::NOT_FOUND,
            ChatError::Persistence(_) => codes::PERSISTENCE_ERROR,
        };
        self.registry
            .send_to(conn_id, ServerEvent::error(code, error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenService;
    use crate::repository::memory::{MemoryMessageRepository, MemoryUserRepository};
    use chrono::Duration;
    use tokio::sync::mpsc;
    use uuid::Uuid;

    struct Fixture {
        gateway: ChatGateway<MemoryMessageRepository, MemoryUserRepository>,
        tokens: Arc<TokenService>,
        messages: Arc<MemoryMessageRepository>,
        users: Arc<MemoryUserRepository>,
    }

    fn fixture() -> Fixture {
        let tokens = Arc::new(TokenService::new(
            "test-secret",
            Duration::minutes(15),
            Duration::days(7),
        ));
        let registry = Arc::new(ConnectionRegistry::new(tokens.clone()));
        let messages = Arc::new(MemoryMessageRepository::new());
        let users = Arc::new(MemoryUserRepository::new());
        Fixture {
            gateway: ChatGateway::new(registry, messages.clone(), users.clone()),
            tokens,
            messages,
            users,
        }
    }

    impl Fixture {
        fn open(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
            let conn_id = Uuid::new_v4();
            let (tx, rx) = mpsc::unbounded_channel();
            self.gateway.registry().connect(conn_id, tx);
            (conn_id, rx)
        }

        async fn open_joined(
            &self,
            user_id: UserId,
        ) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
            let (conn_id, mut rx) = self.open();
            let token = self.tokens.issue(user_id).unwrap().access;
            self.gateway
                .handle_event(conn_id, ClientEvent::Join { token })
                .await;
            assert_eq!(rx.try_recv().unwrap(), ServerEvent::Joined { user_id });
            (conn_id, rx)
        }
    }

    #[tokio::test]
    async fn message_before_join_is_rejected_and_never_persisted() {
        let fx = fixture();
        fx.users.seed("maple");
        fx.users.seed("birch");
        let (conn, mut rx) = fx.open();

        fx.gateway
            .handle_event(
                conn,
                ClientEvent::Message {
                    receiver_id: 2,
                    text: "hi".to_string(),
                },
            )
            .await;

        assert_eq!(fx.messages.len(), 0);
        match rx.try_recv().unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, codes::AUTHENTICATION_ERROR),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn join_with_bad_token_keeps_connection_unauthenticated() {
        let fx = fixture();
        let (conn, mut rx) = fx.open();

        fx.gateway
            .handle_event(
                conn,
                ClientEvent::Join {
                    token: "garbage".to_string(),
                },
            )
            .await;

        match rx.try_recv().unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, codes::AUTHENTICATION_ERROR),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(fx.gateway.registry().identity_of(conn), None);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_persistence() {
        let fx = fixture();
        fx.users.seed("maple");
        fx.users.seed("birch");
        let (conn, mut rx) = fx.open_joined(1).await;

        fx.gateway
            .handle_event(
                conn,
                ClientEvent::Message {
                    receiver_id: 2,
                    text: "   ".to_string(),
                },
            )
            .await;

        assert_eq!(fx.messages.len(), 0);
        match rx.try_recv().unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, codes::VALIDATION_ERROR),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_receiver_is_rejected() {
        let fx = fixture();
        fx.users.seed("maple");
        let (conn, mut rx) = fx.open_joined(1).await;

        fx.gateway
            .handle_event(
                conn,
                ClientEvent::Message {
                    receiver_id: 99,
                    text: "hi".to_string(),
                },
            )
            .await;

        assert_eq!(fx.messages.len(), 0);
        match rx.try_recv().unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, codes::NOT_FOUND),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn persistence_failure_reports_to_sender_and_broadcasts_nothing() {
        let fx = fixture();
        fx.users.seed("maple");
        fx.users.seed("birch");
        let (sender_conn, mut sender_rx) = fx.open_joined(1).await;
        let (_receiver_conn, mut receiver_rx) = fx.open_joined(2).await;

        fx.messages.fail_saves(true);
        fx.gateway
            .handle_event(
                sender_conn,
                ClientEvent::Message {
                    receiver_id: 2,
                    text: "hi".to_string(),
                },
            )
            .await;

        match sender_rx.try_recv().unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, codes::PERSISTENCE_ERROR),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(receiver_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn message_reaches_both_rooms_with_persisted_fields() {
        let fx = fixture();
        fx.users.seed("maple");
        fx.users.seed("birch");
        let (sender_conn, mut sender_rx) = fx.open_joined(1).await;
        let (_receiver_conn, mut receiver_rx) = fx.open_joined(2).await;

        fx.gateway
            .handle_event(
                sender_conn,
                ClientEvent::Message {
                    receiver_id: 2,
                    text: "hi".to_string(),
                },
            )
            .await;

        let to_sender = sender_rx.try_recv().unwrap();
        let to_receiver = receiver_rx.try_recv().unwrap();
        assert_eq!(to_sender, to_receiver);
        match to_sender {
            ServerEvent::Message {
                id,
                sender_id,
                receiver_id,
                text,
                ..
            } => {
                assert_eq!(id, 1);
                assert_eq!(sender_id, 1);
                assert_eq!(receiver_id, 2);
                assert_eq!(text, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        // The broadcast happened after persistence: history sees it.
        let history = fx.messages.history(1, 2).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "hi");
    }

    #[tokio::test]
    async fn senders_other_connection_observes_the_message() {
        let fx = fixture();
        fx.users.seed("maple");
        fx.users.seed("birch");
        let (sender_conn, _sender_rx) = fx.open_joined(1).await;
        let (_other_conn, mut other_rx) = fx.open_joined(1).await;
        let (_receiver_conn, _receiver_rx) = fx.open_joined(2).await;

        fx.gateway
            .handle_event(
                sender_conn,
                ClientEvent::Message {
                    receiver_id: 2,
                    text: "hi".to_string(),
                },
            )
            .await;

        assert!(matches!(
            other_rx.try_recv().unwrap(),
            ServerEvent::Message { .. }
        ));
    }

    #[tokio::test]
    async fn typing_goes_only_to_receiver_room() {
        let fx = fixture();
        fx.users.seed("maple");
        fx.users.seed("birch");
        let (sender_conn, mut sender_rx) = fx.open_joined(1).await;
        let (_receiver_conn, mut receiver_rx) = fx.open_joined(2).await;

        fx.gateway
            .handle_event(
                sender_conn,
                ClientEvent::Typing {
                    receiver_id: 2,
                    is_typing: true,
                },
            )
            .await;

        assert_eq!(
            receiver_rx.try_recv().unwrap(),
            ServerEvent::Typing {
                sender_id: 1,
                is_typing: true
            }
        );
        assert!(sender_rx.try_recv().is_err());
        assert_eq!(fx.messages.len(), 0);
    }

    #[tokio::test]
    async fn typing_before_join_is_rejected() {
        let fx = fixture();
        let (conn, mut rx) = fx.open();

        fx.gateway
            .handle_event(
                conn,
                ClientEvent::Typing {
                    receiver_id: 2,
                    is_typing: true,
                },
            )
            .await;

        match rx.try_recv().unwrap() {
            ServerEvent::Error { code, .. } => assert_eq!(code, codes::AUTHENTICATION_ERROR),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn disconnect_leaves_registry_clean() {
        let fx = fixture();
        fx.users.seed("maple");
        let (conn, _rx) = fx.open_joined(1).await;

        fx.gateway.handle_disconnect(conn);
        assert_eq!(fx.gateway.registry().identity_of(conn), None);
        assert_eq!(fx.gateway.registry().room_count(), 0);

        // Disconnect is idempotent.
        fx.gateway.handle_disconnect(conn);
    }
}
