//! Bearer-token authentication for axum.
//!
//! - [`auth_middleware`] validates an `Authorization: Bearer` header through
//!   the `SessionValidator` port and stores the `AuthenticatedUser` in the
//!   request extensions
//! - [`RequireAuth`] reads it back out in handlers
//!
//! ```text
//! Request → auth_middleware → extensions[AuthenticatedUser]
//!                                      ↓
//!                              Handler → RequireAuth
//! ```
//!
//! A request without a header passes through untouched and is left to the
//! extractor. A header that fails validation is rejected here. The chat
//! socket sits outside this layer and checks its own credentials.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// JSON body of every authentication failure.
#[derive(Debug, Serialize)]
struct AuthErrorBody {
    error: String,
    code: &'static str,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Status code for an authentication failure.
pub fn auth_error_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenExpired => {
            StatusCode::UNAUTHORIZED
        }
    }
}

fn auth_error_response(error: &AuthError) -> Response {
    let code = match error {
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            "AUTH_UNAVAILABLE"
        }
        AuthError::MissingToken => "UNAUTHENTICATED",
        AuthError::InvalidToken | AuthError::TokenExpired => "AUTH_ERROR",
    };

    let body = AuthErrorBody {
        error: error.to_string(),
        code,
    };
    (auth_error_status(error), Json(body)).into_response()
}

/// Validate a bearer token if one is present.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            auth_error_response(&e)
        }
    }
}

/// Extractor that requires an authenticated user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => auth_error_response(&AuthError::MissingToken),
        }
    }
}
