//! Session validation port for token validation.
//!
//! The identity provider seen from the chat hub: given the raw token a
//! client presented, it either returns a verified `(user id, username)`
//! pair or fails closed.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for malformed or badly signed tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Never return a user for a token they could not verify
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    struct FixedValidator;

    #[async_trait]
    impl SessionValidator for FixedValidator {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            if token == "good" {
                Ok(AuthenticatedUser::new(UserId::new(1), "alice"))
            } else {
                Err(AuthError::InvalidToken)
            }
        }
    }

    #[tokio::test]
    async fn validator_can_be_used_as_trait_object() {
        let validator: std::sync::Arc<dyn SessionValidator> = std::sync::Arc::new(FixedValidator);

        assert_eq!(validator.validate("good").await.unwrap().username, "alice");
        assert_eq!(validator.validate("bad").await, Err(AuthError::InvalidToken));
    }
}
