//! Session Orchestration
//!
//! `Session` pairs a [`SessionState`] with a conversation driver and runs the
//! state machine's transitions around each remote call. Callers must not run
//! two operations on the same session at once; the registry guarantees this
//! with a per-session mutex.

use crate::conversation::Turn;
use crate::error::SessionError;
use crate::llm_client::ConversationDriver;
use crate::mode::{Mode, ModeClassifier};
use crate::state::{START_GUIDANCE, SessionState};
use std::sync::Arc;
use tracing::{info, warn};

/// Result of submitting an utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant replied. `text` already carries the mode tag when
    /// `mode_changed` is set.
    Reply {
        text: String,
        mode: Mode,
        mode_changed: bool,
    },
    /// No session has been started yet; nothing was recorded.
    NotActive { guidance: &'static str },
}

impl TurnOutcome {
    /// The text to deliver to the user.
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Reply { text, .. } => text,
            TurnOutcome::NotActive { guidance } => guidance,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self {
            TurnOutcome::Reply { mode, .. } => Some(*mode),
            TurnOutcome::NotActive { .. } => None,
        }
    }
}

/// A single conversation and the driver that generates its replies.
pub struct Session {
    state: SessionState,
    classifier: ModeClassifier,
    driver: Arc<dyn ConversationDriver>,
}

impl Session {
    pub fn new(driver: Arc<dyn ConversationDriver>) -> Self {
        Self::with_classifier(driver, ModeClassifier::default())
    }

    pub fn with_classifier(driver: Arc<dyn ConversationDriver>, classifier: ModeClassifier) -> Self {
        Self {
            state: SessionState::Inactive,
            classifier,
            driver,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.state.active().map(|s| s.mode())
    }

    pub fn history(&self) -> &[Turn] {
        self.state.active().map(|s| s.history()).unwrap_or(&[])
    }

    /// Starts a fresh conversation and returns the assistant's opening line.
    ///
    /// If the opening reply cannot be generated the session is still active,
    /// with an empty history, and the error is returned.
    pub async fn start(&mut self, title: &str, description: &str) -> Result<String, SessionError> {
        let active = self.state.start(title, description)?;
        let request = active.opening_request();
        let reply = self
            .driver
            .generate(request.messages, request.max_tokens)
            .await
            .map_err(|e| {
                warn!(error = ?e, "Opening reply unavailable");
                SessionError::Generation(e)
            })?;
        Ok(active.complete_opening(reply))
    }

    /// Processes one user utterance.
    ///
    /// On a driver failure the user turn stays in history, no assistant turn
    /// is added, and a later submit replaces that turn instead of repeating it.
    pub async fn submit(&mut self, utterance: &str) -> Result<TurnOutcome, SessionError> {
        let Some(active) = self.state.active_mut() else {
            info!("Utterance received before session start");
            return Ok(TurnOutcome::NotActive {
                guidance: START_GUIDANCE,
            });
        };

        let pending = active.accept_utterance(&self.classifier, utterance)?;
        let request = pending.request.clone();

        let reply = match self.driver.generate(request.messages, request.max_tokens).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = ?e, "Reply unavailable; user turn kept for retry");
                return Err(SessionError::Generation(e));
            }
        };

        let (mode, mode_changed) = (pending.mode, pending.mode_changed);
        let text = active.complete(pending, reply);
        Ok(TurnOutcome::Reply {
            text,
            mode,
            mode_changed,
        })
    }
}
