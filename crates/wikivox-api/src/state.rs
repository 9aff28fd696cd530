//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use wikivox_chat::ChatOrchestrator;
use wikivox_core::config::WikivoxConfig;

/// Shared application state, cheaply cloned into each handler task.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (read-only after startup).
    pub config: Arc<WikivoxConfig>,
    /// The chat engine serving all sessions.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: WikivoxConfig, orchestrator: ChatOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            start_time: Instant::now(),
        }
    }
}
