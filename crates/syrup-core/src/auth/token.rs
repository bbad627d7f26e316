//! Signed session token service.
//!
//! Issues and validates HS256-signed access/refresh token pairs.
//! Validation returns a typed [`TokenError`] instead of using errors
//! as control flow: callers can distinguish an expired token from a
//! forged or malformed one.
//!
//! There is no revocation list. Logout only clears the transport
//! cookies; a previously issued token stays valid until its natural
//! expiry. This is accepted behavior, not a bug.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use syrup_types::auth::{Claims, TokenKind, TokenPair};
use syrup_types::error::TokenError;
use syrup_types::user::UserId;

/// JWT payload as it appears on the wire.
///
/// `sub` is the stringified user id (JWT convention); `exp` is Unix
/// seconds. `kind` distinguishes the two halves of a pair so a
/// refresh token can never be replayed as an access token check.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    #[serde(default)]
    sub: Option<String>,
    kind: TokenKind,
    exp: i64,
}

/// Issues and validates session tokens with a symmetric key known
/// only to the service.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service.
    ///
    /// `access_ttl` must be strictly shorter than `refresh_ttl`; the
    /// defaults used by the server are 15 minutes and 7 days.
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: a token is expired the instant `exp` passes.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue an access/refresh pair for `subject` at the current instant.
    pub fn issue(&self, subject: UserId) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        Ok(TokenPair {
            access: self.encode(subject, TokenKind::Access, now + self.access_ttl)?,
            refresh: self.encode(subject, TokenKind::Refresh, now + self.refresh_ttl)?,
        })
    }

    /// Validate a token and return its claims.
    ///
    /// Fails with `Expired` once the current time reaches `exp`, with
    /// `MissingSubject` when `sub` is absent or not a user id, and
    /// with `Invalid` for any signature or structure problem.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        let subject = data
            .claims
            .sub
            .as_deref()
            .and_then(|s| s.parse::<UserId>().ok())
            .ok_or(TokenError::MissingSubject)?;

        let expires_at = DateTime::from_timestamp(data.claims.exp, 0).ok_or(TokenError::Invalid)?;

        Ok(Claims {
            subject,
            kind: data.claims.kind,
            expires_at,
        })
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The refresh token itself is neither rotated nor extended; only
    /// a new access token for the same subject is minted.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.validate(refresh_token)?;
        if claims.kind != TokenKind::Refresh {
            return Err(TokenError::WrongKind {
                expected: TokenKind::Refresh,
                actual: claims.kind,
            });
        }
        self.encode(claims.subject, TokenKind::Access, Utc::now() + self.access_ttl)
    }

    fn encode(
        &self,
        subject: UserId,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let wire = WireClaims {
            sub: Some(subject.to_string()),
            kind,
            exp: expires_at.timestamp(),
        };
        encode(&Header::default(), &wire, &self.encoding_key).map_err(|_| TokenError::Invalid)
    }
}
