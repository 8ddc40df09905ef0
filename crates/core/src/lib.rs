//! Banter Core
//!
//! Session state, mode classification, and prompt assembly for a turn-taking
//! voice conversation. Transport and speech services live outside this crate;
//! the only outbound dependency is a [`llm_client::ConversationDriver`].

pub mod conversation;
pub mod error;
pub mod llm_client;
pub mod mode;
pub mod prompt;
pub mod registry;
pub mod session;
pub mod state;

pub use error::{SessionError, SessionId};
pub use mode::Mode;
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{Session, TurnOutcome};
