//! GetChatHistoryHandler - Query handler for recent chat history.
//!
//! Used both for the join-time replay inside the hub and for the plain
//! HTTP history endpoint. The repository hands back the newest messages
//! first; display order is chronological, so the result is reversed.

use std::sync::Arc;

use crate::domain::chat::{ChatError, ChatMessage};
use crate::ports::ChatMessageRepository;

/// Largest history window any caller may request.
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Query for the most recent messages.
#[derive(Debug, Clone, Copy)]
pub struct GetChatHistoryQuery {
    pub limit: u32,
}

impl GetChatHistoryQuery {
    pub fn new(limit: u32) -> Self {
        Self { limit }
    }
}

/// Handler returning recent messages, oldest first.
#[derive(Clone)]
pub struct GetChatHistoryHandler {
    repository: Arc<dyn ChatMessageRepository>,
}

impl GetChatHistoryHandler {
    pub fn new(repository: Arc<dyn ChatMessageRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetChatHistoryQuery) -> Result<Vec<ChatMessage>, ChatError> {
        let limit = query.limit.clamp(1, MAX_HISTORY_LIMIT);

        let mut messages = self.repository.recent(limit).await?;
        messages.reverse();

        Ok(messages)
    }
}
