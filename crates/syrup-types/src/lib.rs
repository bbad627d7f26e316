//! Shared domain types for the Syrup chat backend.
//!
//! This crate contains the types used across the platform: users,
//! messages, chat previews, session claims, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod message;
pub mod user;
