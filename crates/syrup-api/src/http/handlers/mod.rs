//! Request handlers for the REST API and the realtime endpoint.

pub mod auth;
pub mod messages;
pub mod ws;
