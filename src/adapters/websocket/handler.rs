//! WebSocket session bootstrap for the chat room.
//!
//! Handles the HTTP → WebSocket upgrade:
//! 1. Resolve the caller's identity (bearer header or `?token=`)
//! 2. Reject with 401 before upgrading if there is none
//! 3. Upgrade with the configured frame ceiling
//! 4. Hand the split socket to a [`Connection`]

use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::Deserialize;

use crate::adapters::http::middleware::{auth_error_status, bearer_token};
use crate::domain::chat::ChatAuthor;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

use super::connection::{Connection, PumpSettings};
use super::hub::HubHandle;
use super::messages::WireMessage;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct ChatSocketState {
    pub hub: HubHandle,
    pub validator: Arc<dyn SessionValidator>,
    pub settings: PumpSettings,
    /// Largest frame or message the transport accepts before closing.
    pub max_frame_bytes: usize,
}

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct WsConnectParams {
    pub token: Option<String>,
}

/// Handle WebSocket upgrade requests for the chat room.
///
/// Route: `GET /api/v1/chat/ws`
pub async fn ws_handler(
    State(state): State<ChatSocketState>,
    headers: HeaderMap,
    Query(params): Query<WsConnectParams>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let user = match authenticate(&state, bearer_token(&headers), params.token.as_deref()).await {
        Ok(user) => user,
        Err(e) => return unauthorized(&e),
    };

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            tracing::warn!(user_id = %user.id, "WebSocket upgrade rejected: {}", rejection);
            return rejection.into_response();
        }
    };

    let author = ChatAuthor::from(user);
    let hub = state.hub.clone();
    let settings = state.settings;

    upgrade
        .max_message_size(state.max_frame_bytes)
        .max_frame_size(state.max_frame_bytes)
        .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| async move {
            let (sink, stream) = socket.split();
            Connection::new(author, hub, settings).serve(sink, stream).await;
        })
}

/// Prefer a bearer header; fall back to a query token for clients that
/// cannot set headers on the upgrade.
async fn authenticate(
    state: &ChatSocketState,
    bearer: Option<&str>,
    query_token: Option<&str>,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer
        .or(query_token.filter(|token| !token.is_empty()))
        .ok_or(AuthError::MissingToken)?;

    state.validator.validate(token).await
}

fn unauthorized(error: &AuthError) -> Response {
    if let AuthError::ServiceUnavailable(msg) = error {
        tracing::error!("Auth service unavailable: {}", msg);
    }

    (auth_error_status(error), Json(WireMessage::error(error.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::storage::InMemoryChatMessageRepository;
    use crate::adapters::websocket::hub::{Hub, HubSettings};
    use crate::domain::foundation::UserId;
    use axum::http::StatusCode;

    fn state(validator: MockSessionValidator) -> ChatSocketState {
        let repo = Arc::new(InMemoryChatMessageRepository::new());
        let (_hub, handle) = Hub::new(repo, HubSettings::default());
        ChatSocketState {
            hub: handle,
            validator: Arc::new(validator),
            settings: PumpSettings::default(),
            max_frame_bytes: 8192,
        }
    }

    #[tokio::test]
    async fn bearer_token_wins_over_query_token() {
        let state = state(
            MockSessionValidator::new()
                .with_test_user("h", 1, "alice")
                .with_test_user("q", 2, "bob"),
        );

        let user = authenticate(&state, Some("h"), Some("q")).await.unwrap();

        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn bad_bearer_token_is_not_rescued_by_query_token() {
        let state = state(MockSessionValidator::new().with_test_user("q", 2, "bob"));

        assert_eq!(
            authenticate(&state, Some("forged"), Some("q")).await,
            Err(AuthError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn query_token_is_validated() {
        let state = state(MockSessionValidator::new().with_test_user("q", 2, "bob"));

        let user = authenticate(&state, None, Some("q")).await.unwrap();

        assert_eq!(user.id, UserId::new(2));
    }

    #[tokio::test]
    async fn missing_identity_is_rejected() {
        let state = state(MockSessionValidator::new());

        assert_eq!(
            authenticate(&state, None, None).await,
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            authenticate(&state, None, Some("")).await,
            Err(AuthError::MissingToken)
        );
    }

    #[tokio::test]
    async fn bad_query_token_is_rejected() {
        let state = state(MockSessionValidator::new());

        assert_eq!(
            authenticate(&state, None, Some("nope")).await,
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn unauthorized_response_is_401() {
        let response = unauthorized(&AuthError::MissingToken);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unavailable_validator_is_503() {
        let response = unauthorized(&AuthError::service_unavailable("down"));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
