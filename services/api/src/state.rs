//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared
//! resources handed to every HTTP and WebSocket handler.

use banter_core::SessionRegistry;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(registry: SessionRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}
