//! PostgreSQL implementation of ChatMessageRepository.
//!
//! Persists chat messages to the `chat_messages` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::chat::{ChatAuthor, ChatMessage, MessageBody};
use crate::domain::foundation::{ChatMessageId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::ChatMessageRepository;

/// PostgreSQL implementation of ChatMessageRepository.
#[derive(Clone)]
pub struct PostgresChatMessageRepository {
    pool: PgPool,
}

impl PostgresChatMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatMessageRepository for PostgresChatMessageRepository {
    async fn append(
        &self,
        author: &ChatAuthor,
        body: &MessageBody,
    ) -> Result<ChatMessage, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO chat_messages (user_id, username, message, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, username, message, created_at
            "#,
        )
        .bind(author.user_id.as_i64())
        .bind(&author.username)
        .bind(body.as_str())
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert chat message: {}", e),
            )
        })?;

        row_to_message(row)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<ChatMessage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, username, message, created_at
            FROM chat_messages
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch chat history: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_message).collect()
    }
}

fn row_to_message(row: PgRow) -> Result<ChatMessage, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read chat message row: {}", e),
        )
    };

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let user_id: i64 = row.try_get("user_id").map_err(map_err)?;
    let username: String = row.try_get("username").map_err(map_err)?;
    let message: String = row.try_get("message").map_err(map_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(map_err)?;

    Ok(ChatMessage {
        id: ChatMessageId::new(id),
        user_id: UserId::new(user_id),
        username,
        message,
        created_at: Timestamp::from_datetime(created_at),
    })
}
