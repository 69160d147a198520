//! HTTP routes for chat endpoints.

use axum::{middleware, routing::get, Router};

use crate::adapters::http::middleware::auth_middleware;
use crate::adapters::websocket::{ws_handler, ChatSocketState};

use super::handlers::{get_chat_history, ChatHandlers};

/// Creates the chat router.
///
/// # Routes
/// - `GET /history` - Recent messages (requires auth)
/// - `GET /ws` - WebSocket upgrade (bearer header or `?token=`)
///
/// Only `/history` sits behind [`auth_middleware`]. The socket route
/// validates its own credentials so every rejection before the upgrade
/// carries an `error` wire message.
pub fn chat_routes(handlers: ChatHandlers, socket: ChatSocketState) -> Router {
    let history = Router::new()
        .route("/history", get(get_chat_history))
        .layer(middleware::from_fn_with_state(
            socket.validator.clone(),
            auth_middleware,
        ))
        .with_state(handlers);

    let live = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(socket);

    history.merge(live)
}
