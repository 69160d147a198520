//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the chat core and the outside world. Adapters implement these ports.
//!
//! - `ChatMessageRepository` - Durable storage and replay of chat messages
//! - `SessionValidator` - Token validation yielding a verified identity

mod chat_message_repository;
mod session_validator;

pub use chat_message_repository::ChatMessageRepository;
pub use session_validator::SessionValidator;
