//! HTTP adapters - REST and WebSocket endpoints.
//!
//! ```text
//! /health                  liveness, no auth
//! /api/v1/chat/history     RequireAuth
//! /api/v1/chat/ws          bearer header or ?token=
//! ```

pub mod chat;
pub mod health;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{ChatSocketState, HubHandle, PumpSettings};
use crate::application::GetChatHistoryHandler;
use crate::config::ChatConfig;
use crate::ports::{ChatMessageRepository, SessionValidator};

use self::chat::{chat_routes, ChatHandlers};

/// Everything the HTTP surface needs from the rest of the application.
#[derive(Clone)]
pub struct ApiDependencies {
    pub hub: HubHandle,
    pub repository: Arc<dyn ChatMessageRepository>,
    pub validator: Arc<dyn SessionValidator>,
}

/// Build the full application router.
pub fn app_router(deps: ApiDependencies, chat: &ChatConfig, cors_origins: &[String]) -> Router {
    let handlers = ChatHandlers::new(
        GetChatHistoryHandler::new(deps.repository.clone()),
        chat.query_history_limit,
    );
    let socket = ChatSocketState {
        hub: deps.hub.clone(),
        validator: deps.validator.clone(),
        settings: PumpSettings::new(
            chat.pong_wait(),
            chat.write_wait(),
            chat.outbound_queue_capacity,
        ),
        max_frame_bytes: chat.max_frame_bytes,
    };

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1/chat", chat_routes(handlers, socket))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Allow the configured origins, or any origin when none are configured.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::storage::InMemoryChatMessageRepository;
    use crate::adapters::websocket::{Hub, HubSettings};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let repository: Arc<dyn ChatMessageRepository> =
            Arc::new(InMemoryChatMessageRepository::new());
        let (_hub, hub) = Hub::new(repository.clone(), HubSettings::default());
        let deps = ApiDependencies {
            hub,
            repository,
            validator: Arc::new(MockSessionValidator::new().with_test_user("good", 1, "alice")),
        };
        app_router(deps, &ChatConfig::default(), &[])
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app().oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn history_with_valid_bearer_token() {
        let response = app()
            .oneshot(get_request("/api/v1/chat/history", Some("good")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn history_with_forged_token_is_rejected() {
        let response = app()
            .oneshot(get_request("/api/v1/chat/history", Some("forged")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn socket_auth_failures_share_the_wire_error_shape() {
        for (uri, token, expected) in [
            ("/api/v1/chat/ws", None, "User not authenticated"),
            ("/api/v1/chat/ws", Some("forged"), "Invalid token"),
            ("/api/v1/chat/ws?token=forged", None, "Invalid token"),
        ] {
            let response = app().oneshot(get_request(uri, token)).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(
                body,
                serde_json::json!({ "type": "error", "data": expected }),
                "{} with bearer {:?}",
                uri,
                token
            );
        }
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let response = app().oneshot(get_request("/api/v1/nope", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn cors_layer_accepts_configured_origins() {
        let _ = cors_layer(&["http://localhost:5173".to_string()]);
        let _ = cors_layer(&[]);
    }
}
