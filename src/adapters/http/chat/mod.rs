//! HTTP adapter for the chat room.
//!
//! - `GET /api/v1/chat/history` - Most recent messages, oldest first
//! - `GET /api/v1/chat/ws` - WebSocket upgrade into the live room

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::{get_chat_history, ChatHandlers};
pub use routes::chat_routes;
