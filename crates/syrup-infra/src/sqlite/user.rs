//! SQLite user repository implementation.

use chrono::{DateTime, Utc};
use sqlx::Row;

use syrup_core::repository::UserRepository;
use syrup_types::error::RepositoryError;
use syrup_types::user::{User, UserId};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;

    Ok(User {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        login: row
            .try_get("login")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        password_hash: row
            .try_get("password_hash")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        avatar_url: row
            .try_get("avatar_url")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at,
    })
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, login: &str, password_hash: &str) -> Result<User, RepositoryError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (login, password_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(login)
        .bind(password_hash)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(result) => Ok(User {
                id: result.last_insert_rowid(),
                login: login.to_string(),
                password_hash: password_hash.to_string(),
                avatar_url: None,
                created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("login '{login}' already exists")),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE login = ?")
            .bind(login)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let repo = SqliteUserRepository::new(test_pool().await);

        let created = repo.create("maple", "argon2-hash").await.unwrap();
        assert!(created.id > 0);

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.login, "maple");
        assert_eq!(by_id.password_hash, "argon2-hash");

        let by_login = repo.get_by_login("maple").await.unwrap().unwrap();
        assert_eq!(by_login.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_login_conflicts() {
        let repo = SqliteUserRepository::new(test_pool().await);

        repo.create("maple", "hash-a").await.unwrap();
        let err = repo.create("maple", "hash-b").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let repo = SqliteUserRepository::new(test_pool().await);

        assert!(repo.get_by_id(404).await.unwrap().is_none());
        assert!(repo.get_by_login("nobody").await.unwrap().is_none());
    }
}
