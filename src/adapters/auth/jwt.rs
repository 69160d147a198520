//! HS256 JWT adapter for session validation.
//!
//! Validates the tokens the API's login endpoint issues: HMAC-SHA256
//! signed with a shared secret and carrying the user's numeric id and
//! username as claims.
//!
//! # Example
//!
//! ```ignore
//! use smarapp::adapters::auth::JwtSessionValidator;
//! use smarapp::ports::SessionValidator;
//!
//! let validator = JwtSessionValidator::new("a-long-shared-secret");
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// JWT claims issued at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiry timestamp (Unix epoch seconds)
    pub exp: i64,
}

/// Validates HS256 tokens signed with the configured secret.
#[derive(Clone)]
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator").finish_non_exhaustive()
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        if claims.username.is_empty() {
            tracing::warn!(user_id = claims.user_id, "Token carries an empty username");
            return Err(AuthError::InvalidToken);
        }

        Ok(AuthenticatedUser::new(UserId::new(claims.user_id), claims.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-at-least-sixteen";

    fn token_with(secret: &str, username: &str, exp_offset_secs: i64) -> String {
        let claims = JwtClaims {
            user_id: 1,
            username: username.to_string(),
            email: Some("test@example.com".to_string()),
            role: Some("user".to_string()),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let validator = JwtSessionValidator::new(SECRET);

        let user = validator
            .validate(&token_with(SECRET, "testuser", 3600))
            .await
            .unwrap();

        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.username, "testuser");
    }

    #[tokio::test]
    async fn wrong_secret_is_rejected() {
        let validator = JwtSessionValidator::new(SECRET);

        let result = validator
            .validate(&token_with("some-other-secret-value", "testuser", 3600))
            .await;

        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let validator = JwtSessionValidator::new(SECRET);

        let result = validator
            .validate(&token_with(SECRET, "testuser", -3600))
            .await;

        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let validator = JwtSessionValidator::new(SECRET);

        let result = validator.validate("not-a-jwt").await;

        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let validator = JwtSessionValidator::new(SECRET);

        let result = validator.validate(&token_with(SECRET, "", 3600)).await;

        assert_eq!(result, Err(AuthError::InvalidToken));
    }
}
