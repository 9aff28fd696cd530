//! Session lifecycle management.
//!
//! A session holds one conversation log and lives from creation until it is
//! deleted or expires idle. Sessions are explicit objects keyed by id; there
//! is no process-global conversation state.

use chrono::{Local, TimeZone};
use serde::Serialize;
use uuid::Uuid;

use crate::log::ConversationLog;

/// One user's active interaction lifetime, holding one conversation log.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    /// Epoch seconds when the session was created.
    pub started_at: i64,
    /// Epoch seconds of the last completed turn.
    pub last_message_at: i64,
    pub log: ConversationLog,
}

/// Summary of a session for listing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: String,
    pub last_message_at: String,
    pub entry_count: usize,
}

/// Creates sessions and decides when they expire.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Idle minutes after which a session expires.
    pub session_timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(session_timeout_minutes: u32) -> Self {
        Self {
            session_timeout_minutes,
        }
    }

    /// Create a fresh session with an empty log.
    pub fn create_session(&self) -> ConversationSession {
        let now = Local::now().timestamp();
        ConversationSession {
            id: Uuid::new_v4(),
            started_at: now,
            last_message_at: now,
            log: ConversationLog::new(),
        }
    }

    /// Check whether a session has been idle past the configured timeout.
    pub fn is_expired(&self, session: &ConversationSession) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.session_timeout_minutes) * 60;
        now - session.last_message_at > timeout_secs
    }

    /// Summarize a session for listing.
    pub fn summarize(&self, session: &ConversationSession) -> SessionSummary {
        SessionSummary {
            id: session.id,
            started_at: format_epoch(session.started_at),
            last_message_at: format_epoch(session.last_message_at),
            entry_count: session.log.len(),
        }
    }
}

/// Format epoch seconds as an ISO 8601 string.
fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
