//! Authentication types for the domain layer.
//!
//! These types represent an identity already verified by the identity
//! provider. The chat hub only ever sees the `(user id, username)` pair;
//! how the token was checked is an adapter concern behind the
//! `SessionValidator` port.

use super::UserId;
use thiserror::Error;

/// Authenticated participant extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier.
    pub id: UserId,

    /// Display name shown to other chat participants.
    pub username: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No token was presented with the request.
    #[error("User not authenticated")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Invalid token")]
    InvalidToken,

    /// The token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator itself could not be reached or is misconfigured.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the client should obtain a fresh token.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenExpired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_new_sets_fields() {
        let user = AuthenticatedUser::new(UserId::new(7), "alice");
        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn token_errors_require_reauthentication() {
        assert!(AuthError::MissingToken.requires_reauthentication());
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(!AuthError::service_unavailable("down").requires_reauthentication());
    }

    #[test]
    fn missing_token_message_matches_http_contract() {
        assert_eq!(AuthError::MissingToken.to_string(), "User not authenticated");
    }
}
