//! Conversational engine for WikiVox.
//!
//! Wires the knowledge lookup, fallback search, and speech adapters into a
//! chat flow: per-session append-only conversation logs, the query resolver
//! with its fallback policy, and a plain-text transcript export.

pub mod error;
pub mod export;
pub mod log;
pub mod orchestrator;
pub mod resolver;
pub mod session;

pub use error::ChatError;
pub use export::{render_transcript, EXPORT_FILENAME};
pub use log::ConversationLog;
pub use orchestrator::{ChatOrchestrator, TurnOutcome};
pub use resolver::{QueryResolver, ResolutionResult};
pub use session::{ConversationSession, SessionManager, SessionSummary};
