//! WebSocket adapters for the real-time chat room.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     ws_handler (session bootstrap)                  │
//! │   - Resolves identity, rejects with 401 before upgrading            │
//! │   - Upgrades and hands the socket to a Connection                   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ register
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              Hub                                     │
//! │   One task owning membership: join, leave, fan-out, history replay  │
//! │   ├── conn-a  (outbound queue)                                       │
//! │   ├── conn-b  (outbound queue)                                       │
//! │   └── conn-c  (outbound queue)                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//!                     ▲                               │
//!        post_message │                               │ try_send
//!                     │                               ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Connection                                  │
//! │   read pump: decode, post, pong deadline                            │
//! │   write pump: drain queue, coalesce, ping                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol types
//! - [`hub`] - Membership and broadcast event loop
//! - [`connection`] - Per-socket read and write pumps
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod connection;
pub mod handler;
pub mod hub;
pub mod messages;

pub use connection::{Connection, PumpSettings};
pub use handler::{ws_handler, ChatSocketState, WsConnectParams};
pub use hub::{ConnectionHandle, Hub, HubHandle, HubSettings};
pub use messages::{Frame, InboundError, PresenceNotice, SendMessageRequest, WireMessage};
