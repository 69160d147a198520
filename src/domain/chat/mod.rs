//! Chat domain - messages exchanged in the shared chat room.

mod errors;
mod message;

pub use errors::ChatError;
pub use message::{ChatAuthor, ChatMessage, MessageBody, MAX_MESSAGE_CHARS};
