//! Speech input and output adapters for WikiVox.
//!
//! Both directions are trait-based so the chat layer stays independent of the
//! actual audio backend. The shipped implementations shell out to external
//! recognizer/synthesizer commands; mocks are provided for tests.
//!
//! Contract notes:
//! - Speech input collapses every recognition failure (silence, unintelligible
//!   audio, engine error) into the single sentinel string
//!   [`UNRECOGNIZED_UTTERANCE`]. Callers treat it as a normal, if unhelpful,
//!   utterance rather than an error.
//! - Speech output is fire-and-forget: `speak` returns immediately and the
//!   playback task is never joined or cancelled, so overlapping utterances
//!   may produce overlapping audio.

pub mod stt;
pub mod tts;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use wikivox_core::error::WikivoxError;
use wikivox_core::types::Language;

pub use stt::CommandRecognizer;
pub use tts::{CommandSynthesizer, SilentOutput};

/// Sentinel returned for any voice-recognition failure.
pub const UNRECOGNIZED_UTTERANCE: &str = "Sorry, I couldn't understand.";

// =============================================================================
// Error type
// =============================================================================

/// Internal speech-adapter errors.
///
/// Never crosses the `SpeechInput` boundary: recognition failures collapse to
/// the sentinel there. Kept as a typed enum so implementations can log the
/// actual cause before collapsing.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("recognizer failed: {0}")]
    Recognition(String),
    #[error("synthesizer failed: {0}")]
    Synthesis(String),
}

impl From<SpeechError> for WikivoxError {
    fn from(err: SpeechError) -> Self {
        WikivoxError::Speech(err.to_string())
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Captures one spoken utterance and transcribes it.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Block until the speaker falls silent, then transcribe in `language`.
    ///
    /// Never fails: any recognition problem yields [`UNRECOGNIZED_UTTERANCE`].
    async fn capture_utterance(&self, language: Language) -> String;
}

/// Speaks text aloud without blocking the caller.
pub trait SpeechOutput: Send + Sync {
    /// Start speaking `text` on a detached task and return immediately.
    ///
    /// The task is never joined or cancelled and may outlive the request
    /// that triggered it.
    fn speak(&self, text: &str);
}

// =============================================================================
// Mock implementations
// =============================================================================

/// Mock speech input that replays scripted utterances.
///
/// Returns the sentinel once the script is exhausted, mirroring a user who
/// stays silent.
pub struct MockSpeechInput {
    utterances: Mutex<VecDeque<String>>,
}

impl MockSpeechInput {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            utterances: Mutex::new(utterances.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl SpeechInput for MockSpeechInput {
    async fn capture_utterance(&self, _language: Language) -> String {
        self.utterances
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| UNRECOGNIZED_UTTERANCE.to_string())
    }
}

/// Mock speech output that records spoken texts for assertions.
#[derive(Default)]
pub struct MockSpeechOutput {
    spoken: Mutex<Vec<String>>,
}

impl MockSpeechOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts handed to `speak` so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SpeechOutput for MockSpeechOutput {
    fn speak(&self, text: &str) {
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
