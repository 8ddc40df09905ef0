//! API Models
//!
//! Serializable views of in-memory session state, annotated with `utoipa`
//! for the OpenAPI document.

use banter_core::{
    Mode, Session,
    conversation::{Role, Turn},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationMode {
    Gitter,
    Bargain,
}

impl From<Mode> for ConversationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Gitter => ConversationMode::Gitter,
            Mode::Bargain => ConversationMode::Bargain,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct Message {
    #[schema(value_type = String, example = "user")]
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.into(),
            content: turn.content.clone(),
            created_at: turn.created_at,
        }
    }
}

/// Point-in-time view of a live session.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionSnapshot {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    pub active: bool,
    #[schema(example = "Space Travel")]
    pub title: Option<String>,
    #[schema(example = "exploring Mars colonization")]
    pub description: Option<String>,
    pub mode: Option<ConversationMode>,
    pub history: Vec<Message>,
}

impl SessionSnapshot {
    pub fn capture(id: Uuid, session: &Session) -> Self {
        let active = session.state().active();
        Self {
            id,
            active: active.is_some(),
            title: active.map(|s| s.title().to_string()),
            description: active.map(|s| s.description().to_string()),
            mode: active.map(|s| s.mode().into()),
            history: session.history().iter().map(Message::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionList {
    #[schema(value_type = Vec<String>)]
    pub session_ids: Vec<Uuid>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}
