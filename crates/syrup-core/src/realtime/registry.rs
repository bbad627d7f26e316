//! Live connection and room registry.
//!
//! The single source of truth for "who is live and in which room".
//! One explicitly owned instance is shared behind an `Arc`; callers
//! receive a handle, never a hidden global.
//!
//! Lock discipline: the connection map and the room map are never
//! held across an operation on the other. Identity is bound before a
//! connection enters its room and a connection leaves its room before
//! the identity is dropped, so room membership only ever references
//! connections whose identity the registry knows.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use syrup_types::error::RegistryError;
use syrup_types::user::UserId;

use crate::auth::token::TokenService;
use crate::realtime::event::ServerEvent;

/// Transport-assigned identifier for one live connection.
pub type ConnectionId = Uuid;

/// Broadcast room key for an identity; one room per user.
pub fn room_for(user_id: UserId) -> String {
    format!("user_{user_id}")
}

struct ConnectionEntry {
    /// Bound on successful join, exactly once, never rebound.
    user_id: Option<UserId>,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

/// Registry of live connections, their identities, and their rooms.
pub struct ConnectionRegistry {
    tokens: Arc<TokenService>,
    connections: DashMap<ConnectionId, ConnectionEntry>,
    rooms: DashMap<String, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a freshly opened, unauthenticated connection with its
    /// outbound event queue.
    pub fn connect(&self, conn_id: ConnectionId, sender: mpsc::UnboundedSender<ServerEvent>) {
        self.connections.insert(
            conn_id,
            ConnectionEntry {
                user_id: None,
                sender,
            },
        );
        debug!(%conn_id, "connection registered");
    }

    /// Authenticate a connection and admit it into its identity's room.
    ///
    /// On any failure the registry is left untouched: the connection
    /// stays unauthenticated and belongs to no room.
    pub fn join(&self, conn_id: ConnectionId, token: &str) -> Result<UserId, RegistryError> {
        let claims = self.tokens.validate(token)?;
        let user_id = claims.subject;

        {
            let mut entry = self
                .connections
                .get_mut(&conn_id)
                .ok_or(RegistryError::UnknownConnection)?;
            if entry.user_id.is_some() {
                return Err(RegistryError::AlreadyJoined);
            }
            entry.user_id = Some(user_id);
        }

        self.rooms
            .entry(room_for(user_id))
            .or_default()
            .insert(conn_id);

        info!(%conn_id, user_id, room = %room_for(user_id), "connection joined room");
        Ok(user_id)
    }

    /// Remove a connection from its room and drop its identity binding.
    ///
    /// Idempotent: called on every disconnect path, and calling it for
    /// an unknown connection is a no-op. Rooms are garbage-collected
    /// when their last member leaves so churn never accumulates empty
    /// rooms.
    pub fn leave(&self, conn_id: ConnectionId) {
        let user_id = match self.connections.get(&conn_id) {
            Some(entry) => entry.user_id,
            None => return,
        };

        if let Some(user_id) = user_id {
            let room = room_for(user_id);
            let now_empty = match self.rooms.get_mut(&room) {
                Some(mut members) => {
                    members.remove(&conn_id);
                    members.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.rooms.remove_if(&room, |_, members| members.is_empty());
            }
            info!(%conn_id, user_id, %room, "connection left room");
        }

        self.connections.remove(&conn_id);
    }

    /// The trusted identity bound to a connection, if any.
    ///
    /// This is the only way the gateway resolves a sender; client
    /// payload fields are never consulted.
    pub fn identity_of(&self, conn_id: ConnectionId) -> Option<UserId> {
        self.connections.get(&conn_id).and_then(|e| e.user_id)
    }

    /// Deliver an event to every live connection in `room`.
    ///
    /// Fire-and-forget per member: a connection whose queue is gone
    /// (mid-disconnect) is skipped and never blocks the others.
    pub fn broadcast(&self, room: &str, event: &ServerEvent) {
        let members: Vec<ConnectionId> = match self.rooms.get(room) {
            Some(members) => members.iter().copied().collect(),
            None => return,
        };

        for conn_id in members {
            if let Some(entry) = self.connections.get(&conn_id) {
                if entry.sender.send(event.clone()).is_err() {
                    warn!(%conn_id, %room, "dropping event for closed connection");
                }
            }
        }
    }

    /// Deliver an event to a single connection (protocol errors,
    /// join acknowledgments).
    pub fn send_to(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(entry) = self.connections.get(&conn_id) {
            let _ = entry.sender.send(event);
        }
    }

    /// Number of live connections (diagnostics).
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of non-empty rooms (diagnostics).
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
