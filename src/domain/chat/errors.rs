//! Chat-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised while posting or reading chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The message body did not pass validation.
    Validation(ValidationError),
    /// The persistence provider rejected the operation.
    Persistence(String),
    /// An outbound frame could not be encoded.
    Encoding(String),
    /// The hub event loop is no longer running.
    HubUnavailable,
}

impl ChatError {
    pub fn persistence(message: impl Into<String>) -> Self {
        ChatError::Persistence(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        ChatError::Encoding(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::Validation(_) => ErrorCode::ValidationFailed,
            ChatError::Persistence(_) => ErrorCode::DatabaseError,
            ChatError::Encoding(_) => ErrorCode::InternalError,
            ChatError::HubUnavailable => ErrorCode::ServiceUnavailable,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ChatError::Validation(err) => err.to_string(),
            ChatError::Persistence(msg) => format!("Failed to save message: {}", msg),
            ChatError::Encoding(msg) => format!("Failed to encode message: {}", msg),
            ChatError::HubUnavailable => "Chat hub is not running".to_string(),
        }
    }
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ChatError {}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        ChatError::Persistence(err.message)
    }
}

impl From<ValidationError> for ChatError {
    fn from(err: ValidationError) -> Self {
        ChatError::Validation(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Encoding(err.to_string())
    }
}
