//! Business logic and repository trait definitions for the Syrup chat
//! backend.
//!
//! This crate defines the "ports" (repository traits) that the
//! infrastructure layer implements, plus the services built on top of
//! them: token issuance/validation, the live connection registry, the
//! realtime chat gateway, and the conversation aggregator. It depends
//! only on `syrup-types` -- never on `syrup-infra` or any database/IO
//! crate.

pub mod auth;
pub mod chat;
pub mod realtime;
pub mod repository;
