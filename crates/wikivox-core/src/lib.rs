//! Shared types, configuration, and errors for the WikiVox assistant.

pub mod config;
pub mod error;
pub mod types;

pub use config::WikivoxConfig;
pub use error::{Result, WikivoxError};
pub use types::{ConversationEntry, Language, QueryRequest, Speaker};
