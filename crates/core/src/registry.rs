//! Session Registry
//!
//! Keys every conversation by a [`SessionId`]. Each session sits behind its
//! own async mutex so turns on one session are serialized while different
//! sessions proceed independently.

use crate::error::{SessionError, SessionId};
use crate::llm_client::ConversationDriver;
use crate::mode::ModeClassifier;
use crate::session::Session;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// Shared, serialized access to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

pub struct SessionRegistry {
    driver: Arc<dyn ConversationDriver>,
    classifier: ModeClassifier,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(driver: Arc<dyn ConversationDriver>) -> Self {
        Self::with_classifier(driver, ModeClassifier::default())
    }

    pub fn with_classifier(driver: Arc<dyn ConversationDriver>, classifier: ModeClassifier) -> Self {
        Self {
            driver,
            classifier,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn new_session(&self) -> SessionHandle {
        Arc::new(Mutex::new(Session::with_classifier(
            self.driver.clone(),
            self.classifier.clone(),
        )))
    }

    /// Registers a new, inactive session.
    pub async fn create(&self) -> (SessionId, SessionHandle) {
        let id = Uuid::new_v4();
        let handle = self.new_session();
        self.sessions.write().await.insert(id, handle.clone());
        info!(session_id = %id, "Session registered");
        (id, handle)
    }

    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Replaces the session with a fresh inactive one under the same id.
    ///
    /// Holders of the old handle keep a detached session that is no longer
    /// reachable through the registry.
    pub async fn reset(&self, id: SessionId) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        *slot = self.new_session();
        info!(session_id = %id, "Session reset");
        Ok(slot.clone())
    }

    pub async fn remove(&self, id: SessionId) -> Option<SessionHandle> {
        let removed = self.sessions.write().await.remove(&id);
        if removed.is_some() {
            info!(session_id = %id, "Session removed");
        }
        removed
    }

    pub async fn ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
