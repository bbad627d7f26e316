use thiserror::Error;

/// Token validation and refresh failures.
///
/// An explicit result type rather than exceptions: every caller sees
/// exactly why a token was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("token has no subject")]
    MissingSubject,

    #[error("expected a {expected} token, got {actual}")]
    WrongKind {
        expected: crate::auth::TokenKind,
        actual: crate::auth::TokenKind,
    },
}

/// Failures while admitting or resolving realtime connections.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("authentication failed: {0}")]
    Authentication(#[from] TokenError),

    #[error("unknown connection")]
    UnknownConnection,

    #[error("connection already bound to an identity")]
    AlreadyJoined,
}

/// Failures while handling realtime chat events.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("connection is not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("receiver not found")]
    ReceiverNotFound,

    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}

/// Registration and login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login '{0}' already exists")]
    LoginTaken(String),

    #[error("invalid login or password")]
    InvalidCredentials,

    #[error("password hashing failed")]
    Hashing,

    #[error("token issuance failed")]
    Token,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in syrup-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
