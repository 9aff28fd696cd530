//! Command-backed text-to-speech.
//!
//! Synthesis and playback run inside an external command (espeak, say, piper
//! wrappers, ...) spawned on a detached tokio task so the chat flow never
//! waits on audio duration.

use tokio::process::Command;
use tracing::{debug, warn};

use wikivox_core::config::SpeechConfig;

use crate::SpeechOutput;

/// Speech output adapter that delegates to an external synthesizer command.
///
/// Must be used from within a tokio runtime: `speak` spawns the playback
/// task onto the current runtime.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    command: String,
    args: Vec<String>,
}

impl CommandSynthesizer {
    /// Build from config. Returns `None` when no synthesizer command is set.
    pub fn from_config(config: &SpeechConfig) -> Option<Self> {
        if config.synthesizer_command.trim().is_empty() {
            return None;
        }
        Some(Self {
            command: config.synthesizer_command.clone(),
            args: config.synthesizer_args.clone(),
        })
    }
}

impl SpeechOutput for CommandSynthesizer {
    fn speak(&self, text: &str) {
        let command = self.command.clone();
        let args = self.args.clone();
        let text = text.to_string();

        // Detached: the handle is dropped, the task is never joined or
        // cancelled, and overlapping utterances may overlap audibly.
        tokio::spawn(async move {
            let result = Command::new(&command).args(&args).arg(&text).status().await;
            match result {
                Ok(status) if status.success() => {
                    debug!(chars = text.len(), "Utterance played");
                }
                Ok(status) => {
                    warn!(%status, "Synthesizer exited with failure");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to spawn synthesizer");
                }
            }
        });
    }
}

/// No-op speech output used when speech is disabled in config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentOutput;

impl SpeechOutput for SilentOutput {
    fn speak(&self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_command() {
        let config = SpeechConfig::default();
        assert!(CommandSynthesizer::from_config(&config).is_none());

        let config = SpeechConfig {
            synthesizer_command: "espeak".to_string(),
            synthesizer_args: vec!["-s".to_string(), "150".to_string()],
            ..SpeechConfig::default()
        };
        let synth = CommandSynthesizer::from_config(&config).unwrap();
        assert_eq!(synth.command, "espeak");
        assert_eq!(synth.args, vec!["-s", "150"]);
    }

    #[tokio::test]
    async fn test_speak_returns_immediately() {
        let synth = CommandSynthesizer {
            command: "wikivox-test-no-such-binary".to_string(),
            args: vec![],
        };
        // Spawn failure happens on the detached task; speak itself never errors.
        synth.speak("hello");
    }

    #[test]
    fn test_silent_output_is_noop() {
        SilentOutput.speak("anything");
    }
}
