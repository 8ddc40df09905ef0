//! Session State Machine
//!
//! The state is an explicit `Inactive`/`Active` value. Transitions are plain
//! synchronous methods that update the state and hand back the
//! [`GenerationRequest`] the caller must send to the conversation driver, so
//! the whole lifecycle can be exercised without a network.

use crate::conversation::{GenerationRequest, Role, Turn};
use crate::error::SessionError;
use crate::mode::{Mode, ModeClassifier};
use crate::prompt::{build_session_context, build_system_prompt};
use tracing::{debug, info};

/// Returned for any utterance received before a session has been started.
pub const START_GUIDANCE: &str =
    "Please start a session first by providing a title and description.";

/// Conversation state for a started session.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    title: String,
    description: String,
    system_context: String,
    mode: Mode,
    history: Vec<Turn>,
    /// Mode in effect before the trailing user turn, while that turn still
    /// awaits a reply.
    pending_from: Option<Mode>,
}

impl ActiveSession {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn system_context(&self) -> &str {
        &self.system_context
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// True when the last user turn never received a reply.
    pub fn awaiting_reply(&self) -> bool {
        self.pending_from.is_some()
    }

    /// The prompt for the opening reply: the session context on its own.
    pub fn opening_request(&self) -> GenerationRequest {
        GenerationRequest::new(self.system_context.clone(), &[])
    }

    /// Records a user utterance and prepares the reply request.
    ///
    /// A trailing user turn left behind by a failed generation is replaced
    /// rather than duplicated, and the mode it set is rolled back first, so
    /// the change flag always compares against the stored mode.
    pub fn accept_utterance(
        &mut self,
        classifier: &ModeClassifier,
        utterance: &str,
    ) -> Result<PendingReply, SessionError> {
        if utterance.trim().is_empty() {
            return Err(SessionError::MalformedInput(
                "utterance must not be empty".to_string(),
            ));
        }

        if let Some(previous) = self.pending_from.take() {
            if matches!(self.history.last(), Some(turn) if turn.role == Role::User) {
                self.history.pop();
            }
            if previous != self.mode {
                debug!(from = %self.mode, to = %previous, "Unanswered turn discarded; mode restored");
            }
            self.mode = previous;
        }

        let previous = self.mode;
        let mode = classifier.classify(utterance);
        let mode_changed = mode != previous;
        if mode_changed {
            info!(from = %previous, to = %mode, "Conversation mode changed");
        }
        self.mode = mode;
        self.history.push(Turn::user(utterance));
        self.pending_from = Some(previous);

        let system_prompt = build_system_prompt(&self.system_context, mode);
        let request = GenerationRequest::new(system_prompt, &self.history);
        debug!(
            messages = request.messages.len(),
            history = self.history.len(),
            "Prepared generation request"
        );

        Ok(PendingReply {
            request,
            mode,
            mode_changed,
        })
    }

    /// Appends the generated reply for a prepared turn and returns the text
    /// to deliver, tagged with the new mode when it changed.
    pub fn complete(&mut self, pending: PendingReply, reply: String) -> String {
        self.pending_from = None;
        let text = if pending.mode_changed {
            format!("{}{}", pending.mode.indicator(), reply)
        } else {
            reply
        };
        self.history.push(Turn::assistant(text.clone()));
        text
    }

    /// Appends the opening reply produced for [`ActiveSession::opening_request`].
    pub fn complete_opening(&mut self, reply: String) -> String {
        self.history.push(Turn::assistant(reply.clone()));
        reply
    }
}

/// A user turn that has been recorded and is waiting for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub request: GenerationRequest,
    pub mode: Mode,
    pub mode_changed: bool,
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Inactive,
    Active(ActiveSession),
}

impl SessionState {
    /// Starts (or restarts) the session, discarding any previous history.
    ///
    /// Returns the fresh session, whose [`ActiveSession::opening_request`]
    /// produces the greeting. A blank title is rejected and leaves the current
    /// state untouched.
    pub fn start(
        &mut self,
        title: &str,
        description: &str,
    ) -> Result<&mut ActiveSession, SessionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SessionError::MalformedInput(
                "title must not be empty".to_string(),
            ));
        }
        let description = description.trim();

        let active = ActiveSession {
            title: title.to_string(),
            description: description.to_string(),
            system_context: build_session_context(title, description),
            mode: Mode::Gitter,
            history: Vec::new(),
            pending_from: None,
        };
        info!(title = %title, "Session started");
        *self = SessionState::Active(active);
        match self {
            SessionState::Active(active) => Ok(active),
            SessionState::Inactive => unreachable!("state was set to Active above"),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::Inactive => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::Inactive => None,
        }
    }
}
