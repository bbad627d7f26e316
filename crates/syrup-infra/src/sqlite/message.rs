//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `syrup-core` using sqlx with
//! split read/write pools. The message log is append-only; rows carry
//! the canonical conversation key so conversation reads are a single
//! indexed lookup regardless of who sent what.

use chrono::{DateTime, Utc};
use sqlx::Row;

use syrup_core::repository::MessageRepository;
use syrup_types::error::RepositoryError;
use syrup_types::message::{Message, conversation_key};
use syrup_types::user::UserId;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row types
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    text: String,
    sent_at: String,
    conversation_key: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            receiver_id: row.try_get("receiver_id")?,
            text: row.try_get("text")?,
            sent_at: row.try_get("sent_at")?,
            conversation_key: row.try_get("conversation_key")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        Ok(Message {
            id: self.id,
            sender_id: self.sender_id,
            receiver_id: self.receiver_id,
            text: self.text,
            sent_at: parse_datetime(&self.sent_at)?,
            conversation_key: self.conversation_key,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn save(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        let sent_at = Utc::now();
        let key = conversation_key(sender_id, receiver_id);

        let result = sqlx::query(
            r#"INSERT INTO messages (sender_id, receiver_id, text, sent_at, conversation_key)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(text)
        .bind(format_datetime(&sent_at))
        .bind(&key)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Message {
            id: result.last_insert_rowid(),
            sender_id,
            receiver_id,
            text: text.to_string(),
            sent_at,
            conversation_key: key,
        })
    }

    async fn history(&self, a: UserId, b: UserId) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE conversation_key = ?
               ORDER BY sent_at ASC, id ASC"#,
        )
        .bind(conversation_key(a, b))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(r.into_message()?);
        }
        Ok(messages)
    }

    async fn last_message(&self, a: UserId, b: UserId) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM messages
               WHERE conversation_key = ?
               ORDER BY sent_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(conversation_key(a, b))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = MessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn companions_of(&self, user: UserId) -> Result<Vec<UserId>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT DISTINCT
                 CASE WHEN sender_id = ? THEN receiver_id ELSE sender_id END AS companion_id
               FROM messages
               WHERE sender_id = ? OR receiver_id = ?
               ORDER BY companion_id ASC"#,
        )
        .bind(user)
        .bind(user)
        .bind(user)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut companions = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row
                .try_get("companion_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            companions.push(id);
        }
        Ok(companions)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
