//! WebSocket message types for the chat room.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: chat, join, leave, error, history
//! - Client → Server: a single post request carrying the body text

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chat::{ChatMessage, MessageBody};
use crate::domain::foundation::{UserId, ValidationError};

/// An encoded server message, shared between every outbound queue it is
/// fanned out to.
pub type Frame = Arc<str>;

// ============================================
// Server → Client Messages
// ============================================

/// All message kinds that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// A message was just posted and persisted.
    Chat {
        data: ChatMessage,
        user_id: UserId,
        message: String,
    },

    /// A participant connected.
    Join(PresenceNotice),

    /// A participant disconnected.
    Leave(PresenceNotice),

    /// Something went wrong before the connection was established.
    Error { data: String },

    /// Recent messages, oldest first. Sent only to a newly joined connection.
    History { data: Vec<ChatMessage> },
}

/// Payload of `join` and `leave` announcements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceNotice {
    pub user_id: UserId,
    pub message: String,
}

impl WireMessage {
    pub fn chat(message: ChatMessage) -> Self {
        WireMessage::Chat {
            user_id: message.user_id,
            message: message.message.clone(),
            data: message,
        }
    }

    pub fn join(user_id: UserId, username: &str) -> Self {
        WireMessage::Join(PresenceNotice {
            user_id,
            message: format!("{} joined the chat", username),
        })
    }

    pub fn leave(user_id: UserId, username: &str) -> Self {
        WireMessage::Leave(PresenceNotice {
            user_id,
            message: format!("{} left the chat", username),
        })
    }

    pub fn error(text: impl Into<String>) -> Self {
        WireMessage::Error { data: text.into() }
    }

    pub fn history(messages: Vec<ChatMessage>) -> Self {
        WireMessage::History { data: messages }
    }

    /// Serialize to the JSON text sent over the socket.
    pub fn encode(&self) -> Result<Frame, serde_json::Error> {
        Ok(Arc::from(serde_json::to_string(self)?))
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// Request to post a message to the room.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Why an inbound frame was skipped.
#[derive(Debug, Error)]
pub enum InboundError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid message: {0}")]
    Invalid(#[from] ValidationError),
}

impl SendMessageRequest {
    /// Decode a raw client frame into a validated message body.
    pub fn decode(raw: &[u8]) -> Result<MessageBody, InboundError> {
        let request: SendMessageRequest = serde_json::from_slice(raw)?;
        Ok(MessageBody::parse(request.message)?)
    }
}
