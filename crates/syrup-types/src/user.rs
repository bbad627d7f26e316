//! User identity types.
//!
//! Users are the external-collaborator surface of the chat core: the
//! realtime and aggregation paths only ever see them through the
//! `UserRepository` port defined in syrup-core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-assigned user identifier (autoincrement primary key).
pub type UserId = i64;

/// A registered user account.
///
/// `password_hash` is an Argon2 PHC string and never leaves the
/// backend; serialize [`UserProfile`] instead when responding to
/// clients.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Client-facing projection of a [`User`] without credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub login: String,
    pub avatar_url: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_drops_password_hash() {
        let user = User {
            id: 7,
            login: "maple".to_string(),
            password_hash: "$argon2id$...".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
        };

        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("maple"));
    }
}
