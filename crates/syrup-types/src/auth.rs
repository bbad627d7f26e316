//! Session claim types.
//!
//! Claims are carried inside signed tokens and never persisted. The
//! wire encoding (JWT payload) lives with the token service in
//! syrup-core; these are the validated, typed results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Which half of an issued token pair a claim belongs to.
///
/// Access claims are short-lived (minutes) and authorize protected
/// actions; refresh claims are long-lived (days) and are only good
/// for minting new access claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenKind::Access),
            "refresh" => Ok(TokenKind::Refresh),
            other => Err(format!("invalid token kind: '{other}'")),
        }
    }
}

/// Validated claims extracted from a signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: UserId,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

/// An access/refresh token pair issued at a single instant.
///
/// The access expiry is always strictly shorter than the refresh
/// expiry.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}
