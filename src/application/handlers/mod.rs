//! Application handlers.

pub mod chat;

pub use chat::{GetChatHistoryHandler, GetChatHistoryQuery, MAX_HISTORY_LIMIT};
