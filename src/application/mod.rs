//! Application layer - Queries and their handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{GetChatHistoryHandler, GetChatHistoryQuery, MAX_HISTORY_LIMIT};
