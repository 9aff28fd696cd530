use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, WikivoxError};
use crate::types::Language;

/// Environment variable that overrides the configured SerpAPI key.
pub const SERPAPI_KEY_ENV: &str = "WIKIVOX_SERPAPI_KEY";

/// Top-level configuration for the WikiVox application.
///
/// Loaded from `~/.wikivox/config.toml` by default. Each section corresponds
/// to one service crate or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WikivoxConfig {
    pub general: GeneralConfig,
    pub lookup: LookupConfig,
    pub search: SearchConfig,
    pub speech: SpeechConfig,
    pub chat: ChatConfig,
}

impl WikivoxConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: WikivoxConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WikivoxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// API server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3030,
        }
    }
}

/// Encyclopedia lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Default lookup language for requests that do not specify one.
    pub language: Language,
    /// Fetch full article bodies instead of short summaries by default.
    pub full_article: bool,
    /// Number of sentences in a short summary.
    pub summary_sentences: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            language: Language::En,
            full_article: false,
            summary_sentences: 3,
        }
    }
}

/// Fallback web-search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// SerpAPI endpoint URL.
    pub endpoint: String,
    /// SerpAPI credential. Prefer the `WIKIVOX_SERPAPI_KEY` env var over
    /// storing the key in the config file.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl SearchConfig {
    /// Resolve the API key: environment variable wins over the config file.
    pub fn resolve_api_key(&self) -> String {
        std::env::var(SERPAPI_KEY_ENV).unwrap_or_else(|_| self.api_key.clone())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://serpapi.com/search.json".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Speech input/output configuration.
///
/// Recognition and synthesis shell out to external commands so the binary
/// carries no audio-device dependencies; both are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether speech input/output is enabled at all.
    pub enabled: bool,
    /// Recognizer command; receives the language code as its final argument
    /// and must print the transcribed utterance to stdout.
    pub recognizer_command: String,
    /// Extra arguments passed to the recognizer before the language code.
    pub recognizer_args: Vec<String>,
    /// Synthesizer command; receives the text to speak as its final argument.
    pub synthesizer_command: String,
    /// Extra arguments passed to the synthesizer before the text.
    pub synthesizer_args: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            recognizer_command: String::new(),
            recognizer_args: vec![],
            synthesizer_command: String::new(),
            synthesizer_args: vec![],
        }
    }
}

/// Chat session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Idle minutes after which a session expires.
    pub session_timeout_minutes: u32,
    /// Maximum query length in characters.
    pub max_message_length: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 30,
            max_message_length: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WikivoxConfig::default();
        assert_eq!(config.general.port, 3030);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.lookup.language, Language::En);
        assert!(!config.lookup.full_article);
        assert_eq!(config.lookup.summary_sentences, 3);
        assert_eq!(config.search.timeout_secs, 10);
        assert_eq!(config.search.endpoint, "https://serpapi.com/search.json");
        assert!(config.search.api_key.is_empty());
        assert!(!config.speech.enabled);
        assert_eq!(config.chat.session_timeout_minutes, 30);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = WikivoxConfig::default();
        config.general.port = 8080;
        config.lookup.language = Language::Fr;
        config.lookup.full_article = true;
        config.save(&path).unwrap();

        let loaded = WikivoxConfig::load(&path).unwrap();
        assert_eq!(loaded.general.port, 8080);
        assert_eq!(loaded.lookup.language, Language::Fr);
        assert!(loaded.lookup.full_article);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(WikivoxConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = WikivoxConfig::load_or_default(&path);
        assert_eq!(config.general.port, 3030);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[lookup]\nlanguage = \"de\"\n").unwrap();

        let config = WikivoxConfig::load(&path).unwrap();
        assert_eq!(config.lookup.language, Language::De);
        assert_eq!(config.general.port, 3030);
        assert_eq!(config.search.timeout_secs, 10);
    }

    #[test]
    fn test_unknown_language_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[lookup]\nlanguage = \"xx\"\n").unwrap();
        assert!(WikivoxConfig::load(&path).is_err());
    }

    #[test]
    fn test_resolve_api_key_prefers_env() {
        let mut config = SearchConfig::default();
        config.api_key = "from-file".to_string();

        std::env::remove_var(SERPAPI_KEY_ENV);
        assert_eq!(config.resolve_api_key(), "from-file");

        std::env::set_var(SERPAPI_KEY_ENV, "from-env");
        assert_eq!(config.resolve_api_key(), "from-env");
        std::env::remove_var(SERPAPI_KEY_ENV);
    }
}
