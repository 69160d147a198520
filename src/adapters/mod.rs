//! Adapters - Implementations of port interfaces and the outer surfaces.
//!
//! - `auth` - `SessionValidator` implementations (JWT, mock)
//! - `postgres` - `ChatMessageRepository` on PostgreSQL
//! - `storage` - `ChatMessageRepository` in process memory
//! - `websocket` - Chat hub, connection pumps and upgrade handler
//! - `http` - Router, middleware and REST endpoints

pub mod auth;
pub mod http;
pub mod postgres;
pub mod storage;
pub mod websocket;
