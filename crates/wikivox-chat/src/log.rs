//! Append-only conversation log.

use serde::{Deserialize, Serialize};

use wikivox_core::types::{ConversationEntry, Speaker};

/// Ordered record of one session's conversation.
///
/// Mutated only by append; entries are never reordered or truncated while the
/// session lives. The entry list is private to keep that invariant honest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry at the end of the log.
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.entries.push(ConversationEntry::new(speaker, text));
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Text of the most recent User entry, if any.
    ///
    /// Used for duplicate suppression: a re-submitted query identical to the
    /// previous one is a UI re-render, not a new turn.
    pub fn last_user_text(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.speaker == Speaker::User)
            .map(|entry| entry.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
