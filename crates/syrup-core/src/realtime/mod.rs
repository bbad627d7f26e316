//! Realtime messaging: wire events, the live connection registry, and
//! the chat gateway protocol handler.

pub mod event;
pub mod gateway;
pub mod registry;

pub use event::{ClientEvent, ServerEvent};
pub use gateway::ChatGateway;
pub use registry::{ConnectionId, ConnectionRegistry, room_for};
