//! Command-backed speech recognition.
//!
//! Runs an external recognizer process that owns the microphone, waits for
//! silence, and prints the transcription to stdout. The process receives the
//! language code as its final argument.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use wikivox_core::config::SpeechConfig;
use wikivox_core::types::Language;

use crate::{SpeechError, SpeechInput, UNRECOGNIZED_UTTERANCE};

/// Speech input adapter that delegates to an external recognizer command.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    command: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Build from config. Returns `None` when no recognizer command is set.
    pub fn from_config(config: &SpeechConfig) -> Option<Self> {
        if config.recognizer_command.trim().is_empty() {
            return None;
        }
        Some(Self {
            command: config.recognizer_command.clone(),
            args: config.recognizer_args.clone(),
        })
    }

    /// Run the recognizer and return its trimmed stdout.
    async fn run(&self, language: Language) -> Result<String, SpeechError> {
        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(language.as_str())
            .output()
            .await
            .map_err(|e| SpeechError::Recognition(e.to_string()))?;

        if !output.status.success() {
            return Err(SpeechError::Recognition(format!(
                "recognizer exited with {}",
                output.status
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(SpeechError::Recognition("empty transcription".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl SpeechInput for CommandRecognizer {
    async fn capture_utterance(&self, language: Language) -> String {
        // All failure kinds collapse to the sentinel; the cause is only logged.
        match self.run(language).await {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "Recognition failed");
                UNRECOGNIZED_UTTERANCE.to_string()
            }
        }
    }
}
