//! Registration and login orchestration.
//!
//! Verifies credentials against the user repository and issues the
//! session token pair. Transport concerns (cookies) stay in the API
//! layer.

use std::sync::Arc;

use tracing::{info, warn};

use syrup_types::auth::TokenPair;
use syrup_types::error::{AuthError, RepositoryError};
use syrup_types::user::User;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::repository::UserRepository;

/// Creates accounts and authenticates logins.
///
/// Generic over the user repository and password hasher so the core
/// never depends on the infrastructure layer.
pub struct AuthService<U: UserRepository, H: PasswordHasher> {
    users: Arc<U>,
    hasher: H,
    tokens: Arc<TokenService>,
}

impl<U: UserRepository, H: PasswordHasher> AuthService<U, H> {
    pub fn new(users: Arc<U>, hasher: H, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user and issue their first token pair.
    pub async fn register(&self, login: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let password_hash = self.hasher.hash(password)?;

        let user = match self.users.create(login, &password_hash).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict(_)) => {
                warn!(login, "registration rejected, login taken");
                return Err(AuthError::LoginTaken(login.to_string()));
            }
            Err(e) => return Err(AuthError::Storage(e)),
        };

        let pair = self
            .tokens
            .issue(user.id)
            .map_err(|_| AuthError::Token)?;
        info!(user_id = user.id, login, "user registered");
        Ok((user, pair))
    }

    /// Authenticate an existing user and issue a fresh token pair.
    ///
    /// Unknown logins and bad passwords produce the same
    /// `InvalidCredentials` error so the response never reveals which
    /// half was wrong.
    pub async fn login(&self, login: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let user = self
            .users
            .get_by_login(login)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            warn!(login, "login rejected, bad password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self
            .tokens
            .issue(user.id)
            .map_err(|_| AuthError::Token)?;
        info!(user_id = user.id, login, "user logged in");
        Ok((user, pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryUserRepository;
    use chrono::Duration;

    /// Reversed-string "hash"; enough to test orchestration.
    struct FakeHasher;

    impl PasswordHasher for FakeHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(password.chars().rev().collect())
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.hash(password).unwrap() == hash
        }
    }

    fn service() -> AuthService<MemoryUserRepository, FakeHasher> {
        let tokens = Arc::new(TokenService::new(
            "test-secret",
            Duration::minutes(15),
            Duration::days(7),
        ));
        AuthService::new(Arc::new(MemoryUserRepository::new()), FakeHasher, tokens)
    }

    #[tokio::test]
    async fn register_issues_tokens_for_new_user() {
        let svc = service();
        let (user, pair) = svc.register("maple", "hunter2").await.unwrap();
        assert_eq!(user.login, "maple");
        assert!(!pair.access.is_empty());
        assert!(!pair.refresh.is_empty());
    }

    #[tokio::test]
    async fn register_rejects_taken_login() {
        let svc = service();
        svc.register("maple", "hunter2").await.unwrap();

        let err = svc.register("maple", "other").await.unwrap_err();
        assert!(matches!(err, AuthError::LoginTaken(_)));
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_password() {
        let svc = service();
        let (registered, _) = svc.register("maple", "hunter2").await.unwrap();

        let (user, _) = svc.login("maple", "hunter2").await.unwrap();
        assert_eq!(user.id, registered.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_password_and_unknown_login_alike() {
        let svc = service();
        svc.register("maple", "hunter2").await.unwrap();

        let bad_password = svc.login("maple", "wrong").await.unwrap_err();
        let unknown = svc.login("birch", "hunter2").await.unwrap_err();
        assert!(matches!(bad_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }
}
