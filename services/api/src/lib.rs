//! Banter API Library Crate
//!
//! HTTP and WebSocket transport for the conversation core: configuration,
//! shared state, REST inspection handlers, the WebSocket session loop, and
//! routing. The `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod ws;
