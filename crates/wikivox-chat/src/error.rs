//! Error types for the conversational engine.
//!
//! Lookup and search failures never appear here: the query resolver converts
//! them into user-visible reply text. These errors cover the session and
//! request plumbing around the resolver.

use wikivox_core::error::WikivoxError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),
    #[error("voice input is not configured")]
    VoiceUnavailable,
    #[error("session state error: {0}")]
    SessionState(String),
}

impl From<ChatError> for WikivoxError {
    fn from(err: ChatError) -> Self {
        WikivoxError::Chat(err.to_string())
    }
}
