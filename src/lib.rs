//! SmarApp chat - real-time multi-user chat hub.
//!
//! Authenticated clients connect over WebSocket, post messages that are
//! persisted and fanned out to everyone connected, and receive recent
//! history when they join.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
