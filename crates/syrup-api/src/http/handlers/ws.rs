//! WebSocket handler for realtime chat.
//!
//! `/ws/chat` upgrades the HTTP connection and registers it with the
//! connection registry as unauthenticated; the client must send a
//! `join` event before anything else is processed.
//!
//! Two tasks serve each connection: the read loop below parses inbound
//! frames into the gateway, and a forwarding task drains the
//! connection's outbound queue into the WebSocket sink, so a stalled
//! peer never blocks a broadcast. Every exit path of the read loop
//! funnels through `handle_disconnect`, which removes the connection
//! from the registry and its room.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use syrup_core::realtime::gateway::codes;
use syrup_core::realtime::{ClientEvent, ServerEvent};

use crate::state::AppState;

/// Upgrade an HTTP request to the realtime chat WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    state.gateway.registry().connect(conn_id, tx);

    // Forwarding task: outbound queue -> WebSocket sink. Ends when the
    // registry entry (the queue's sender) is dropped on disconnect.
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(%conn_id, error = %err, "failed to serialize outbound event");
                }
            }
        }
    });

    loop {
        tokio::select! {
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => state.gateway.handle_event(conn_id, event).await,
                            Err(err) => {
                                tracing::warn!(%conn_id, error = %err, "malformed event frame");
                                state.gateway.registry().send_to(
                                    conn_id,
                                    ServerEvent::error(codes::VALIDATION_ERROR, "malformed event frame"),
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%conn_id, error = %err, "websocket receive error");
                        break;
                    }
                    // Binary, ping, pong protocol frames are handled by axum.
                    Some(Ok(_)) => {}
                }
            }
            _ = &mut send_task => break,
        }
    }

    state.gateway.handle_disconnect(conn_id);
    send_task.abort();
    tracing::debug!(%conn_id, "websocket connection closed");
}
