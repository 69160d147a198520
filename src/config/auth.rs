//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest signing secret accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 16;

/// Authentication configuration (HS256 JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the API's tokens are signed with
    pub jwt_secret: Secret<String>,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Secret::new(jwt_secret.into()),
        }
    }

    /// Validate authentication configuration
    ///
    /// The secret must be present. In production it must also be long
    /// enough to resist brute force.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }

        if *environment == Environment::Production && secret.chars().count() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_LEN));
        }

        Ok(())
    }
}
