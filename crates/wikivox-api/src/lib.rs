//! HTTP API for WikiVox.
//!
//! Serves the single-page chat front-end: chat turns (text and voice),
//! per-session history, transcript export, and session management.
//! Lookup failures never surface as HTTP errors; they are normal bot replies.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
