//! Repository trait definitions ("ports") implemented by syrup-infra.

pub mod message;
pub mod user;

pub use message::MessageRepository;
pub use user::UserRepository;

#[cfg(test)]
pub(crate) mod memory;
