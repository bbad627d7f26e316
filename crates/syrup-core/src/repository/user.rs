//! User repository trait definition.
//!
//! The chat core treats user storage as an external collaborator: the
//! gateway only resolves receivers, the aggregator only reads
//! profiles, and the auth service creates and looks up accounts.

use syrup_types::error::RepositoryError;
use syrup_types::user::{User, UserId};

/// Repository trait for user accounts.
pub trait UserRepository: Send + Sync {
    /// Create a user. Returns `Conflict` if the login is taken.
    fn create(
        &self,
        login: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Look up a user by id.
    fn get_by_id(
        &self,
        id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by login.
    fn get_by_login(
        &self,
        login: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
