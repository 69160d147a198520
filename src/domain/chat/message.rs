//! Chat message value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AuthenticatedUser, ChatMessageId, Timestamp, UserId, ValidationError,
};

/// Upper bound on a message body, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// A persisted chat message. Immutable once the store has assigned its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub user_id: UserId,
    pub username: String,
    pub message: String,
    pub created_at: Timestamp,
}

/// Validated body text of a message a participant wants to post.
///
/// Holds between 1 and [`MAX_MESSAGE_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn parse(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let chars = text.chars().count();
        if chars == 0 {
            return Err(ValidationError::empty_field("message"));
        }
        if chars > MAX_MESSAGE_CHARS {
            return Err(ValidationError::too_long("message", MAX_MESSAGE_CHARS, chars));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Who is posting: the identity the connection was authenticated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAuthor {
    pub user_id: UserId,
    pub username: String,
}

impl ChatAuthor {
    pub fn new(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

impl From<AuthenticatedUser> for ChatAuthor {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn body_accepts_regular_text() {
        let body = MessageBody::parse("Hello, world!").unwrap();
        assert_eq!(body.as_str(), "Hello, world!");
    }

    #[test]
    fn body_rejects_empty_text() {
        assert_eq!(
            MessageBody::parse(""),
            Err(ValidationError::empty_field("message"))
        );
    }

    #[test]
    fn body_accepts_exactly_max_chars() {
        let text = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(MessageBody::parse(text).is_ok());
    }

    #[test]
    fn body_rejects_one_over_max_chars() {
        let text = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            MessageBody::parse(text),
            Err(ValidationError::TooLong { actual: 1001, .. })
        ));
    }

    #[test]
    fn body_length_counts_characters_not_bytes() {
        // 1000 two-byte characters are still within the limit.
        let text = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(MessageBody::parse(text).is_ok());
    }

    #[test]
    fn chat_message_serializes_with_snake_case_fields() {
        let msg = ChatMessage {
            id: ChatMessageId::new(1),
            user_id: UserId::new(2),
            username: "testuser".to_string(),
            message: "Hello, world!".to_string(),
            created_at: Timestamp::from_datetime(
                Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
            ),
        };

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["user_id"], 2);
        assert_eq!(json["username"], "testuser");
        assert_eq!(json["message"], "Hello, world!");
        assert_eq!(json["created_at"], "2025-01-10T00:00:00Z");
    }

    #[test]
    fn author_from_authenticated_user() {
        let author: ChatAuthor = AuthenticatedUser::new(UserId::new(3), "bob").into();
        assert_eq!(author, ChatAuthor::new(UserId::new(3), "bob"));
    }
}
