use uuid::Uuid;

/// Identifier of a session held by a [`crate::registry::SessionRegistry`].
pub type SessionId = Uuid;

/// Errors surfaced by session operations. None of them are fatal; the
/// transport reports them to the user and keeps the connection alive.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The conversation driver failed or timed out. Any user turn stays in
    /// history and the call may be retried.
    #[error("reply unavailable: {0}")]
    Generation(#[source] anyhow::Error),
    /// A required field was empty. Nothing was changed.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("session {0} not found")]
    NotFound(SessionId),
}

impl SessionError {
    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Generation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_display() {
        let err = SessionError::Generation(anyhow::anyhow!("connection reset"));
        assert_eq!(err.to_string(), "reply unavailable: connection reset");
        assert!(err.is_retryable());

        let err = SessionError::MalformedInput("title must not be empty".into());
        assert_eq!(err.to_string(), "malformed input: title must not be empty");
        assert!(!err.is_retryable());

        let id = Uuid::nil();
        assert_eq!(
            SessionError::NotFound(id).to_string(),
            format!("session {} not found", id)
        );
    }
}
