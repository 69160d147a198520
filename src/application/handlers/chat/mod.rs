//! Chat query handlers.

mod get_chat_history;

pub use get_chat_history::{GetChatHistoryHandler, GetChatHistoryQuery, MAX_HISTORY_LIMIT};
