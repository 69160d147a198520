//! Chat message repository port.
//!
//! The persistence provider behind the hub: it durably appends posted
//! messages and replays the most recent ones.
//!
//! # Ordering
//!
//! `recent` returns messages **newest first**. Callers that display
//! history reverse it (see `GetChatHistoryHandler`).

use async_trait::async_trait;

use crate::domain::chat::{ChatAuthor, ChatMessage, MessageBody};
use crate::domain::foundation::DomainError;

/// Repository port for chat message persistence.
///
/// Appends are serialized by the hub; reads may run concurrently with
/// each other and with an in-flight append.
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Store a new message and return it with its assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn append(
        &self,
        author: &ChatAuthor,
        body: &MessageBody,
    ) -> Result<ChatMessage, DomainError>;

    /// Fetch up to `limit` of the most recent messages, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<ChatMessage>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ChatMessageRepository) {}
    }

    #[test]
    fn arc_dyn_repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<std::sync::Arc<dyn ChatMessageRepository>>();
    }
}
