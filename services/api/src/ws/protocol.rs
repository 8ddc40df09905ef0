//! Defines the WebSocket message protocol between the browser client and the API server.

use crate::models::ConversationMode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Starts (or restarts) the conversation on this connection.
    StartSession {
        title: String,
        #[serde(default)]
        description: String,
    },
    /// A typed message from the user.
    UserMessage { content: String },
    /// A spoken message, already transcribed by the client.
    VoiceMessage { content: String },
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once when the connection is established.
    SessionReady { session_id: Uuid },
    /// Text from the assistant. `speak` asks the client to read it aloud.
    AiResponse {
        content: String,
        speak: bool,
        mode: Option<ConversationMode>,
    },
    /// A failed request. `retryable` is set when resending may succeed.
    Error { message: String, retryable: bool },
}

impl ServerMessage {
    pub fn spoken(content: impl Into<String>, mode: Option<ConversationMode>) -> Self {
        ServerMessage::AiResponse {
            content: content.into(),
            speak: true,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_message_deserialization() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"start_session","title":"Space Travel","description":"Mars"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::StartSession {
                title: "Space Travel".into(),
                description: "Mars".into()
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"start_session","title":"Solo"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::StartSession {
                title: "Solo".into(),
                description: String::new()
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"voice_message","content":"hi"}"#).unwrap();
        assert_eq!(msg, ClientMessage::VoiceMessage { content: "hi".into() });
    }

    #[test]
    fn test_client_message_rejects_unknown_shapes() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"webrtc_offer","sdp":"x"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"user_message"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn test_server_message_serialization() {
        let value = serde_json::to_value(ServerMessage::spoken(
            "[BARGAIN MODE] Two options.",
            Some(ConversationMode::Bargain),
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "type": "ai_response",
                "content": "[BARGAIN MODE] Two options.",
                "speak": true,
                "mode": "bargain"
            })
        );

        let value = serde_json::to_value(ServerMessage::Error {
            message: "reply unavailable".into(),
            retryable: true,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"type": "error", "message": "reply unavailable", "retryable": true})
        );

        let id = Uuid::nil();
        let value = serde_json::to_value(ServerMessage::SessionReady { session_id: id }).unwrap();
        assert_eq!(value["type"], "session_ready");
        assert_eq!(value["session_id"], id.to_string());
    }
}
