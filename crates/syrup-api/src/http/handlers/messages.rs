//! Chat list and conversation history handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use syrup_core::repository::{MessageRepository, UserRepository};
use syrup_types::chat::ChatPreview;
use syrup_types::message::{Message, MessageId};
use syrup_types::user::UserId;

use crate::http::error::AppError;
use crate::http::extractors::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Client-facing projection of a stored message. The internal
/// conversation key stays server-side.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id,
            sender_id: msg.sender_id,
            receiver_id: msg.receiver_id,
            text: msg.text,
            timestamp: msg.sent_at,
        }
    }
}

/// GET /api/v1/messages/chats - The requesting user's chat list,
/// newest conversation first.
pub async fn list_chats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ChatPreview>>>, AppError> {
    let start = Instant::now();

    let chats = state.chats.chats_of(user.id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(chats, elapsed)))
}

/// GET /api/v1/messages/history/:companion_id - Full ordered history
/// with one companion.
pub async fn conversation_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(companion_id): Path<UserId>,
) -> Result<Json<ApiResponse<Vec<MessageView>>>, AppError> {
    let start = Instant::now();

    if state.users.get_by_id(companion_id).await?.is_none() {
        return Err(AppError::NotFound(format!("No user with id {companion_id}")));
    }

    let history: Vec<MessageView> = state
        .messages
        .history(user.id, companion_id)
        .await?
        .into_iter()
        .map(MessageView::from)
        .collect();
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(history, elapsed)))
}
