//! WebSocket Session Handling
//!
//! This module contains the real-time transport for conversation sessions:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `session`: Manages the WebSocket connection lifecycle, from handshake to termination.
//! - `turn`: Maps each inbound frame onto the session and builds the reply frame.

pub mod protocol;
pub mod session;
mod turn;

pub use session::ws_handler;
