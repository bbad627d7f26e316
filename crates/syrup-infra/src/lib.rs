//! Infrastructure implementations for Syrup.
//!
//! Provides the concrete SQLite repositories behind the core
//! repository traits and the Argon2 password hasher. Nothing here
//! contains chat semantics; this crate only knows how to store and
//! hash.

pub mod crypto;
pub mod sqlite;
