//! Password hashing seam.
//!
//! The core never touches a concrete hash algorithm; syrup-infra
//! provides the Argon2 implementation.

use syrup_types::error::AuthError;

/// Hashes and verifies user passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string
    /// (salt and parameters included).
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored hash. A malformed
    /// stored hash counts as a mismatch.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
