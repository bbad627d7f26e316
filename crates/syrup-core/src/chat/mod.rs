//! Conversation listing built from the message log.

pub mod aggregator;

pub use aggregator::ConversationAggregator;
