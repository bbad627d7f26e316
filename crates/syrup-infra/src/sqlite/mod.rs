//! SQLite-backed repositories.

pub mod message;
pub mod pool;
pub mod user;

pub use message::SqliteMessageRepository;
pub use pool::{DatabasePool, default_database_url};
pub use user::SqliteUserRepository;
