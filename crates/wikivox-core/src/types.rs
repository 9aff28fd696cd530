//! Core data types shared across WikiVox crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WikivoxError;

// =============================================================================
// Speaker / ConversationEntry
// =============================================================================

/// Who produced a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    /// Display label used in the rendered transcript ("You: ..." / "Bot: ...").
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Bot => "Bot",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the conversation. Immutable once appended; insertion order is
/// display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl ConversationEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

// =============================================================================
// Language
// =============================================================================

/// Lookup languages supported by the assistant.
///
/// The set is closed: unknown codes are rejected at config/parse time rather
/// than passed through to the encyclopedia backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Fr,
    Es,
    De,
}

impl Language {
    /// All supported languages, in UI display order.
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Hi,
        Language::Fr,
        Language::Es,
        Language::De,
    ];

    /// Two-letter ISO 639-1 code, as used in Wikipedia subdomains.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::De => "de",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = WikivoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "fr" => Ok(Language::Fr),
            "es" => Ok(Language::Es),
            "de" => Ok(Language::De),
            other => Err(WikivoxError::Config(format!(
                "unsupported language code: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// QueryRequest
// =============================================================================

/// A single user submission, constructed per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The raw query text.
    pub text: String,
    /// Language to resolve the query in.
    pub language: Language,
    /// Fetch the full article body instead of a short summary.
    pub full_article: bool,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>, language: Language, full_article: bool) -> Self {
        Self {
            text: text.into(),
            language,
            full_article,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
