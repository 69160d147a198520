//! Domain layer containing chat types and their invariants.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, errors)
//! - `chat` - Chat messages, message bodies and chat-specific errors

pub mod chat;
pub mod foundation;
