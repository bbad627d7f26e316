//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. This module provides a
//! `DatabasePool` with a multi-connection reader pool for concurrent
//! reads and a single-connection writer pool for serialized writes.
//! Both use WAL journal mode and enforce foreign keys.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Reader pool size when the caller does not configure one.
pub const DEFAULT_MAX_READERS: u32 = 8;

/// Split read/write pool for SQLite with WAL mode.
///
/// - `reader`: Multi-connection pool for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/UPDATE/DELETE.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Create a new DatabasePool with the default reader limit.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_reader_limit(database_url, DEFAULT_MAX_READERS).await
    }

    /// Create a new DatabasePool with split reader/writer connections
    /// and at most `max_readers` concurrent read connections.
    ///
    /// Runs migrations automatically on the writer pool before the
    /// reader pool opens, so readers never see a half-migrated schema.
    pub async fn with_reader_limit(
        database_url: &str,
        max_readers: u32,
    ) -> Result<Self, sqlx::Error> {
        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(max_readers)
            .connect_with(read_opts)
            .await?;

        Ok(Self { reader, writer })
    }
}

/// Returns the default database URL based on `SYRUP_DATA_DIR` env var,
/// falling back to `~/.syrup/syrup.db`.
pub fn default_database_url() -> String {
    let data_dir = std::env::var("SYRUP_DATA_DIR").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{home}/.syrup")
    });
    format!("sqlite://{data_dir}/syrup.db")
}
