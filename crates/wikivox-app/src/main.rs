//! WikiVox application binary - composition root.
//!
//! Ties together all WikiVox crates into a single executable:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Build the encyclopedia lookup and fallback search clients
//! 3. Wire up speech input/output (command-backed, optional)
//! 4. Build the chat orchestrator and start the axum REST API server

mod cli;

use std::sync::Arc;

use clap::Parser;

use wikivox_api::{routes, AppState};
use wikivox_chat::{ChatOrchestrator, QueryResolver};
use wikivox_core::config::WikivoxConfig;
use wikivox_lookup::{KnowledgeLookup, WikipediaClient};
use wikivox_search::{FallbackSearch, SerpApiClient};
use wikivox_speech::{
    CommandRecognizer, CommandSynthesizer, SilentOutput, SpeechInput, SpeechOutput,
};

use cli::CliArgs;

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

/// Build the speech output: a synthesizer command when speech is enabled and
/// configured, a no-op otherwise.
fn build_speech_output(config: &WikivoxConfig) -> Arc<dyn SpeechOutput> {
    if config.speech.enabled {
        if let Some(synth) = CommandSynthesizer::from_config(&config.speech) {
            tracing::info!("Speech output enabled");
            return Arc::new(synth);
        }
        tracing::warn!("Speech enabled but no synthesizer command configured");
    }
    Arc::new(SilentOutput)
}

/// Build the speech input, or `None` when voice queries are unavailable.
fn build_speech_input(config: &WikivoxConfig) -> Option<Arc<dyn SpeechInput>> {
    if !config.speech.enabled {
        return None;
    }
    match CommandRecognizer::from_config(&config.speech) {
        Some(recognizer) => {
            tracing::info!("Speech input enabled");
            Some(Arc::new(recognizer))
        }
        None => {
            tracing::warn!("Speech enabled but no recognizer command configured");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = WikivoxConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(language) = args.language {
        config.lookup.language = language;
    }
    if args.full_article {
        config.lookup.full_article = true;
    }

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    init_tracing(&log_level);

    tracing::info!("Starting WikiVox v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Lookup and fallback search clients.
    let lookup: Arc<dyn KnowledgeLookup> = Arc::new(WikipediaClient::new(&config.lookup));
    let fallback: Arc<dyn FallbackSearch> = Arc::new(SerpApiClient::new(&config.search)?);
    if config.search.resolve_api_key().is_empty() {
        tracing::warn!("No SerpAPI key configured; fallback search will report errors");
    }

    // Speech.
    let speech_out = build_speech_output(&config);
    let speech_in = build_speech_input(&config);

    // Chat engine.
    let resolver = QueryResolver::new(lookup, fallback);
    let orchestrator = ChatOrchestrator::new(resolver, speech_out, speech_in, config.chat.clone());
    tracing::info!(
        language = %config.lookup.language.as_str(),
        full_article = config.lookup.full_article,
        "Chat engine ready"
    );

    // API server.
    let state = AppState::new(config, orchestrator);
    routes::start_server(state).await?;

    Ok(())
}
