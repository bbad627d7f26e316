//! HTTP/REST and WebSocket layer for Syrup.
//!
//! Axum-based API at `/api/v1/` with cookie session authentication,
//! envelope response format, and CORS support. The realtime chat
//! endpoint lives at `/ws/chat`.

pub mod cookies;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
