//! Storage adapters that live in process memory.

mod in_memory_chat_repository;

pub use in_memory_chat_repository::InMemoryChatMessageRepository;
