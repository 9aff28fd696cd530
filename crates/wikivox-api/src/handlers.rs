//! Route handler functions for all API endpoints.
//!
//! Each handler extracts parameters via axum extractors, drives the chat
//! orchestrator, and returns JSON (or plain text for the transcript export).

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wikivox_chat::{TurnOutcome, EXPORT_FILENAME};
use wikivox_core::types::{ConversationEntry, Language, QueryRequest};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub text: String,
    pub session_id: Option<Uuid>,
    /// Defaults to the configured lookup language.
    pub language: Option<Language>,
    /// Defaults to the configured full-article toggle.
    pub full_article: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct VoiceRequestBody {
    pub session_id: Option<Uuid>,
    pub language: Option<Language>,
    pub full_article: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponseBody {
    pub session_id: Uuid,
    /// Absent when the query was suppressed as empty or duplicate.
    pub reply: Option<String>,
    pub skipped: bool,
    pub history: Vec<ConversationEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceResponseBody {
    pub session_id: Uuid,
    /// What the recognizer heard (possibly the failure sentinel).
    pub heard: String,
    pub reply: Option<String>,
    pub skipped: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub entries: Vec<ConversationEntry>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /chat — run one text chat turn.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, ApiError> {
    let request = QueryRequest::new(
        body.text,
        body.language.unwrap_or(state.config.lookup.language),
        body.full_article.unwrap_or(state.config.lookup.full_article),
    );

    let outcome = state
        .orchestrator
        .handle_query(body.session_id, request)
        .await?;
    let session_id = outcome.session_id();
    let history = state.orchestrator.history(session_id)?;

    let (reply, skipped) = match outcome {
        TurnOutcome::Replied { reply, .. } => (Some(reply), false),
        TurnOutcome::Skipped { .. } => (None, true),
    };

    Ok(Json(ChatResponseBody {
        session_id,
        reply,
        skipped,
        history,
    }))
}

/// POST /chat/voice — capture one utterance and run it as a chat turn.
pub async fn chat_voice(
    State(state): State<AppState>,
    Json(body): Json<VoiceRequestBody>,
) -> Result<Json<VoiceResponseBody>, ApiError> {
    let language = body.language.unwrap_or(state.config.lookup.language);
    let full_article = body.full_article.unwrap_or(state.config.lookup.full_article);

    let (heard, outcome) = state
        .orchestrator
        .handle_voice_query(body.session_id, language, full_article)
        .await?;

    let session_id = outcome.session_id();
    let (reply, skipped) = match outcome {
        TurnOutcome::Replied { reply, .. } => (Some(reply), false),
        TurnOutcome::Skipped { .. } => (None, true),
    };

    Ok(Json(VoiceResponseBody {
        session_id,
        heard,
        reply,
        skipped,
    }))
}

/// GET /sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<wikivox_chat::SessionSummary>>, ApiError> {
    Ok(Json(state.orchestrator.list_sessions()?))
}

/// GET /sessions/{id}/history
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let entries = state.orchestrator.history(id)?;
    Ok(Json(HistoryResponse {
        session_id: id,
        entries,
    }))
}

/// GET /sessions/{id}/export — transcript download.
pub async fn session_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transcript = state.orchestrator.export_transcript(id)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        transcript,
    ))
}

/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.orchestrator.delete_session(id)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
