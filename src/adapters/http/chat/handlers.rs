//! HTTP handlers for chat endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{GetChatHistoryHandler, GetChatHistoryQuery};

use super::dto::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    history_handler: GetChatHistoryHandler,
    history_limit: u32,
}

impl ChatHandlers {
    pub fn new(history_handler: GetChatHistoryHandler, history_limit: u32) -> Self {
        Self {
            history_handler,
            history_limit,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/v1/chat/history - Recent messages, oldest first
pub async fn get_chat_history(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = GetChatHistoryQuery::new(handlers.history_limit);

    match handlers.history_handler.handle(query).await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => {
            tracing::error!(user_id = %user.id, "Failed to fetch chat history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::history_unavailable(&e)),
            )
                .into_response()
        }
    }
}
