//! In-Memory Chat Message Repository
//!
//! Keeps chat messages in process memory. Used by tests and by local
//! development when no database is configured.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::{ChatAuthor, ChatMessage, MessageBody};
use crate::domain::foundation::{ChatMessageId, DomainError, Timestamp};
use crate::ports::ChatMessageRepository;

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<ChatMessage>,
    next_id: i64,
}

/// In-memory storage for chat messages
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatMessageRepository {
    inner: Arc<RwLock<Inner>>,
    fail_appends: Arc<AtomicBool>,
}

impl InMemoryChatMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `append` fail (or succeed again).
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// All stored messages in insertion order.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.read().await.messages.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ChatMessageRepository for InMemoryChatMessageRepository {
    async fn append(
        &self,
        author: &ChatAuthor,
        body: &MessageBody,
    ) -> Result<ChatMessage, DomainError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(DomainError::database("append rejected by in-memory store"));
        }

        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let message = ChatMessage {
            id: ChatMessageId::new(inner.next_id),
            user_id: author.user_id,
            username: author.username.clone(),
            message: body.as_str().to_string(),
            created_at: Timestamp::now(),
        };
        inner.messages.push(message.clone());

        Ok(message)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ChatMessage>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .messages
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn author() -> ChatAuthor {
        ChatAuthor::new(UserId::new(1), "alice")
    }

    fn body(text: &str) -> MessageBody {
        MessageBody::parse(text).unwrap()
    }

    #[tokio::test]
    async fn append_assigns_increasing_ids() {
        let repo = InMemoryChatMessageRepository::new();

        let first = repo.append(&author(), &body("one")).await.unwrap();
        let second = repo.append(&author(), &body("two")).await.unwrap();

        assert_eq!(first.id, ChatMessageId::new(1));
        assert_eq!(second.id, ChatMessageId::new(2));
        assert_eq!(second.username, "alice");
        assert_eq!(second.message, "two");
    }

    #[tokio::test]
    async fn recent_returns_newest_first_up_to_limit() {
        let repo = InMemoryChatMessageRepository::new();
        for text in ["1", "2", "3", "4", "5"] {
            repo.append(&author(), &body(text)).await.unwrap();
        }

        let recent = repo.recent(3).await.unwrap();
        let texts: Vec<_> = recent.iter().map(|m| m.message.as_str()).collect();

        assert_eq!(texts, vec!["5", "4", "3"]);
    }

    #[tokio::test]
    async fn failing_appends_store_nothing() {
        let repo = InMemoryChatMessageRepository::new();
        repo.set_fail_appends(true);

        let result = repo.append(&author(), &body("lost")).await;

        assert!(result.is_err());
        assert!(repo.is_empty().await);

        repo.set_fail_appends(false);
        assert!(repo.append(&author(), &body("kept")).await.is_ok());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryChatMessageRepository::new();
        let clone = repo.clone();

        repo.append(&author(), &body("shared")).await.unwrap();

        assert_eq!(clone.len().await, 1);
    }
}
