//! Turns one inbound client frame into the reply frame for that connection.

use crate::ws::protocol::{ClientMessage, ServerMessage};
use banter_core::{SessionError, SessionHandle, TurnOutcome};
use tracing::{info, warn};

/// Handles a single text frame from the client.
///
/// Every outcome maps to exactly one reply frame; failures never close the
/// connection.
pub async fn handle_text_frame(session: &SessionHandle, text: &str) -> ServerMessage {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed client message");
            return error_frame(SessionError::MalformedInput(format!(
                "unrecognized message: {}",
                e
            )));
        }
    };

    let mut session = session.lock().await;
    match msg {
        ClientMessage::StartSession { title, description } => {
            match session.start(&title, &description).await {
                Ok(opening) => {
                    ServerMessage::spoken(opening, session.mode().map(Into::into))
                }
                Err(e) => error_frame(e),
            }
        }
        ClientMessage::UserMessage { content } | ClientMessage::VoiceMessage { content } => {
            match session.submit(&content).await {
                Ok(outcome) => {
                    if let TurnOutcome::Reply {
                        mode,
                        mode_changed: true,
                        ..
                    } = &outcome
                    {
                        info!(%mode, "Announcing mode change to client");
                    }
                    ServerMessage::spoken(outcome.text(), outcome.mode().map(Into::into))
                }
                Err(e) => error_frame(e),
            }
        }
    }
}

fn error_frame(err: SessionError) -> ServerMessage {
    ServerMessage::Error {
        retryable: err.is_retryable(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationMode;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use banter_core::{Session, conversation::ChatMessage, llm_client::ConversationDriver};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };
    use tokio::sync::Mutex;

    /// Replies with a fixed line, or fails while `failing` is set.
    struct Toggle {
        failing: AtomicBool,
    }

    #[async_trait]
    impl ConversationDriver for Toggle {
        async fn generate(&self, _messages: Vec<ChatMessage>, _max_tokens: u32) -> Result<String> {
            if self.failing.load(Ordering::SeqCst) {
                Err(anyhow!("service unavailable"))
            } else {
                Ok("Sounds good. What next?".to_string())
            }
        }
    }

    fn setup() -> (Arc<Toggle>, SessionHandle) {
        let driver = Arc::new(Toggle {
            failing: AtomicBool::new(false),
        });
        let session = Arc::new(Mutex::new(Session::new(driver.clone())));
        (driver, session)
    }

    #[tokio::test]
    async fn test_user_message_before_start_gets_guidance() {
        let (_, session) = setup();
        let reply = handle_text_frame(&session, r#"{"type":"user_message","content":"hi"}"#).await;
        match reply {
            ServerMessage::AiResponse { content, speak, mode } => {
                assert!(content.contains("start a session"));
                assert!(speak);
                assert_eq!(mode, None);
            }
            other => panic!("Expected ai_response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_start_then_voice_message_switches_mode() {
        let (_, session) = setup();
        let reply = handle_text_frame(
            &session,
            r#"{"type":"start_session","title":"Cars","description":"used cars"}"#,
        )
        .await;
        assert_eq!(
            reply,
            ServerMessage::spoken("Sounds good. What next?", Some(ConversationMode::Gitter))
        );

        let reply = handle_text_frame(
            &session,
            r#"{"type":"voice_message","content":"Let's negotiate the price and settle"}"#,
        )
        .await;
        assert_eq!(
            reply,
            ServerMessage::spoken(
                "[BARGAIN MODE] Sounds good. What next?",
                Some(ConversationMode::Bargain)
            )
        );
    }

    #[tokio::test]
    async fn test_malformed_frames_do_not_touch_session() {
        let (_, session) = setup();
        for frame in ["{", r#"{"type":"webrtc_offer","sdp":""}"#, r#"{"type":"start_session","title":"  "}"#] {
            let reply = handle_text_frame(&session, frame).await;
            assert!(matches!(
                reply,
                ServerMessage::Error {
                    retryable: false,
                    ..
                }
            ));
        }
        assert!(!session.lock().await.is_active());
    }

    #[tokio::test]
    async fn test_generation_failure_is_retryable() {
        let (driver, session) = setup();
        handle_text_frame(&session, r#"{"type":"start_session","title":"Jazz"}"#).await;

        driver.failing.store(true, Ordering::SeqCst);
        let reply =
            handle_text_frame(&session, r#"{"type":"user_message","content":"tell me a story"}"#).await;
        assert!(matches!(reply, ServerMessage::Error { retryable: true, .. }));
        assert_eq!(session.lock().await.history().len(), 2);

        driver.failing.store(false, Ordering::SeqCst);
        let reply =
            handle_text_frame(&session, r#"{"type":"user_message","content":"tell me a story"}"#).await;
        assert!(matches!(reply, ServerMessage::AiResponse { .. }));
        assert_eq!(session.lock().await.history().len(), 3);
    }
}
