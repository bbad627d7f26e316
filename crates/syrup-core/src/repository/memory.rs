//! In-memory repositories for unit tests.
//!
//! Behave like the SQLite implementations (monotonic ids, canonical
//! conversation keys, `(sent_at, id)` ordering) without any IO.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use syrup_types::error::RepositoryError;
use syrup_types::message::{Message, conversation_key};
use syrup_types::user::{User, UserId};

use super::{MessageRepository, UserRepository};

#[derive(Default)]
pub struct MemoryMessageRepository {
    messages: Mutex<Vec<Message>>,
    fail_saves: AtomicBool,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail, simulating storage loss.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl MessageRepository for MemoryMessageRepository {
    async fn save(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("simulated write failure".into()));
        }
        let mut messages = self.messages.lock().unwrap();
        let message = Message {
            id: messages.len() as i64 + 1,
            sender_id,
            receiver_id,
            text: text.to_string(),
            sent_at: Utc::now(),
            conversation_key: conversation_key(sender_id, receiver_id),
        };
        messages.push(message.clone());
        Ok(message)
    }

    async fn history(&self, a: UserId, b: UserId) -> Result<Vec<Message>, RepositoryError> {
        let key = conversation_key(a, b);
        let mut found: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.conversation_key == key)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.sent_at, m.id));
        Ok(found)
    }

    async fn last_message(&self, a: UserId, b: UserId) -> Result<Option<Message>, RepositoryError> {
        Ok(self.history(a, b).await?.into_iter().next_back())
    }

    async fn companions_of(&self, user: UserId) -> Result<Vec<UserId>, RepositoryError> {
        let mut companions: Vec<UserId> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| {
                if m.sender_id == user {
                    Some(m.receiver_id)
                } else if m.receiver_id == user {
                    Some(m.sender_id)
                } else {
                    None
                }
            })
            .collect();
        companions.sort_unstable();
        companions.dedup();
        Ok(companions)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with the next free id and return it.
    pub fn seed(&self, login: &str) -> User {
        let mut users = self.users.lock().unwrap();
        let user = User {
            id: users.len() as i64 + 1,
            login: login.to_string(),
            password_hash: "unused".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        user
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, login: &str, password_hash: &str) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.login == login) {
            return Err(RepositoryError::Conflict(format!(
                "login '{login}' already exists"
            )));
        }
        let user = User {
            id: users.len() as i64 + 1,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.login == login)
            .cloned())
    }
}
