//! Chat orchestrator: central coordinator for one assistant instance.
//!
//! Owns the session map, runs the duplicate-suppression check, drives the
//! query resolver, appends turns to the session log, and hands replies to
//! the speech output. One orchestrator serves all sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{debug, info};
use uuid::Uuid;

use wikivox_core::config::ChatConfig;
use wikivox_core::types::{ConversationEntry, Language, QueryRequest, Speaker};
use wikivox_speech::{SpeechInput, SpeechOutput};

use crate::error::ChatError;
use crate::resolver::QueryResolver;
use crate::session::{ConversationSession, SessionManager, SessionSummary};

/// Result of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Query resolved; one User and one Bot entry were appended and the
    /// reply was handed to speech output.
    Replied { session_id: Uuid, reply: String },
    /// Empty or duplicate query; nothing was looked up, logged, or spoken.
    Skipped { session_id: Uuid },
}

impl TurnOutcome {
    pub fn session_id(&self) -> Uuid {
        match self {
            TurnOutcome::Replied { session_id, .. } => *session_id,
            TurnOutcome::Skipped { session_id } => *session_id,
        }
    }
}

/// Central chat coordinator.
pub struct ChatOrchestrator {
    resolver: QueryResolver,
    speech_out: Arc<dyn SpeechOutput>,
    speech_in: Option<Arc<dyn SpeechInput>>,
    session_manager: SessionManager,
    sessions: Mutex<HashMap<Uuid, ConversationSession>>,
    config: ChatConfig,
}

impl ChatOrchestrator {
    pub fn new(
        resolver: QueryResolver,
        speech_out: Arc<dyn SpeechOutput>,
        speech_in: Option<Arc<dyn SpeechInput>>,
        config: ChatConfig,
    ) -> Self {
        let session_manager = SessionManager::new(config.session_timeout_minutes);
        Self {
            resolver,
            speech_out,
            speech_in,
            session_manager,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Handle one text query.
    ///
    /// Empty text, or text identical to the session's previous User entry,
    /// is a no-op: UI re-renders resubmit the same query and must not grow
    /// the log or trigger a second lookup.
    pub async fn handle_query(
        &self,
        session_id: Option<Uuid>,
        request: QueryRequest,
    ) -> Result<TurnOutcome, ChatError> {
        if request.text.len() > self.config.max_message_length {
            return Err(ChatError::MessageTooLong(self.config.max_message_length));
        }

        let sid = self.resolve_session(session_id)?;

        // Duplicate / empty suppression, checked before any network call.
        {
            let sessions = self.lock_sessions()?;
            let session = sessions.get(&sid).ok_or(ChatError::SessionNotFound(sid))?;
            if request.text.is_empty()
                || session.log.last_user_text() == Some(request.text.as_str())
            {
                debug!(session_id = %sid, "Query skipped (empty or duplicate)");
                return Ok(TurnOutcome::Skipped { session_id: sid });
            }
        }

        // Resolve outside the lock; the resolver never fails.
        let reply = self.resolver.resolve(&request).await;

        {
            let mut sessions = self.lock_sessions()?;
            let session = sessions
                .get_mut(&sid)
                .ok_or(ChatError::SessionNotFound(sid))?;
            session.log.append(Speaker::User, request.text.clone());
            session.log.append(Speaker::Bot, reply.clone());
            session.last_message_at = Local::now().timestamp();
        }

        // Fire-and-forget; rendering never waits on audio.
        self.speech_out.speak(&reply);

        info!(
            session_id = %sid,
            query_len = request.text.len(),
            reply_len = reply.len(),
            "Chat turn completed"
        );
        Ok(TurnOutcome::Replied {
            session_id: sid,
            reply,
        })
    }

    /// Capture one utterance and run it as a chat turn.
    ///
    /// Returns the transcribed text alongside the outcome. Recognition
    /// failures arrive as the sentinel utterance and flow through the normal
    /// query path, matching the text flow exactly.
    pub async fn handle_voice_query(
        &self,
        session_id: Option<Uuid>,
        language: Language,
        full_article: bool,
    ) -> Result<(String, TurnOutcome), ChatError> {
        let input = self.speech_in.as_ref().ok_or(ChatError::VoiceUnavailable)?;
        let heard = input.capture_utterance(language).await;
        debug!(chars = heard.len(), "Utterance captured");

        let outcome = self
            .handle_query(session_id, QueryRequest::new(heard.clone(), language, full_article))
            .await?;
        Ok((heard, outcome))
    }

    /// Ordered entries of a session's log.
    pub fn history(&self, session_id: Uuid) -> Result<Vec<ConversationEntry>, ChatError> {
        let sessions = self.lock_sessions()?;
        let session = sessions
            .get(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        Ok(session.log.entries().to_vec())
    }

    /// Render a session's transcript for download.
    pub fn export_transcript(&self, session_id: Uuid) -> Result<String, ChatError> {
        let sessions = self.lock_sessions()?;
        let session = sessions
            .get(&session_id)
            .ok_or(ChatError::SessionNotFound(session_id))?;
        Ok(crate::export::render_transcript(&session.log))
    }

    /// Summaries of all live sessions.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>, ChatError> {
        let sessions = self.lock_sessions()?;
        Ok(sessions
            .values()
            .map(|s| self.session_manager.summarize(s))
            .collect())
    }

    /// End a session, destroying its log.
    pub fn delete_session(&self, session_id: Uuid) -> Result<(), ChatError> {
        let mut sessions = self.lock_sessions()?;
        if sessions.remove(&session_id).is_some() {
            info!(session_id = %session_id, "Session deleted");
            Ok(())
        } else {
            Err(ChatError::SessionNotFound(session_id))
        }
    }

    // -- Private helpers --

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, ConversationSession>>, ChatError> {
        self.sessions
            .lock()
            .map_err(|e| ChatError::SessionState(format!("session lock poisoned: {}", e)))
    }

    /// Return the requested session if it is still live, otherwise create a
    /// new one (also replacing an expired session).
    fn resolve_session(&self, requested: Option<Uuid>) -> Result<Uuid, ChatError> {
        let mut sessions = self.lock_sessions()?;

        if let Some(sid) = requested {
            if let Some(session) = sessions.get(&sid) {
                if !self.session_manager.is_expired(session) {
                    return Ok(sid);
                }
                debug!(session_id = %sid, "Session expired; replacing");
                sessions.remove(&sid);
            }
        }

        let session = self.session_manager.create_session();
        let sid = session.id;
        sessions.insert(sid, session);
        Ok(sid)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wikivox_lookup::{KnowledgeLookup, LookupError, MockLookup};
    use wikivox_search::{FallbackSearch, MockSearch};
    use wikivox_speech::{MockSpeechInput, MockSpeechOutput, UNRECOGNIZED_UTTERANCE};

    struct Harness {
        orchestrator: ChatOrchestrator,
        lookup: Arc<MockLookup>,
        speech_out: Arc<MockSpeechOutput>,
    }

    fn harness_with(lookup: MockLookup, voice: Option<MockSpeechInput>) -> Harness {
        let lookup = Arc::new(lookup);
        let speech_out = Arc::new(MockSpeechOutput::new());
        let resolver = QueryResolver::new(
            Arc::clone(&lookup) as Arc<dyn KnowledgeLookup>,
            Arc::new(MockSearch::empty()) as Arc<dyn FallbackSearch>,
        );
        let orchestrator = ChatOrchestrator::new(
            resolver,
            Arc::clone(&speech_out) as Arc<dyn SpeechOutput>,
            voice.map(|v| Arc::new(v) as Arc<dyn SpeechInput>),
            ChatConfig::default(),
        );
        Harness {
            orchestrator,
            lookup,
            speech_out,
        }
    }

    fn harness() -> Harness {
        harness_with(MockLookup::with_content("Rust is a language."), None)
    }

    fn request(text: &str) -> QueryRequest {
        QueryRequest::new(text, Language::En, false)
    }

    #[tokio::test]
    async fn test_turn_appends_user_then_bot() {
        let h = harness();
        let outcome = h
            .orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap();

        let sid = outcome.session_id();
        let history = h.orchestrator.history(sid).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[0].text, "Rust");
        assert_eq!(history[1].speaker, Speaker::Bot);
        assert_eq!(history[1].text, "Rust is a language.");
    }

    #[tokio::test]
    async fn test_reply_is_spoken() {
        let h = harness();
        h.orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap();
        assert_eq!(h.speech_out.spoken(), vec!["Rust is a language."]);
    }

    #[tokio::test]
    async fn test_duplicate_query_is_suppressed() {
        let h = harness();
        let first = h
            .orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap();
        let sid = first.session_id();

        let second = h
            .orchestrator
            .handle_query(Some(sid), request("Rust"))
            .await
            .unwrap();
        assert_eq!(second, TurnOutcome::Skipped { session_id: sid });

        // One lookup, two log entries, one utterance: nothing grew.
        assert_eq!(h.lookup.call_count(), 1);
        assert_eq!(h.orchestrator.history(sid).unwrap().len(), 2);
        assert_eq!(h.speech_out.spoken().len(), 1);
    }

    #[tokio::test]
    async fn test_changed_query_is_processed() {
        let h = harness();
        let first = h
            .orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap();
        let sid = first.session_id();

        h.orchestrator
            .handle_query(Some(sid), request("Go"))
            .await
            .unwrap();
        assert_eq!(h.lookup.call_count(), 2);
        assert_eq!(h.orchestrator.history(sid).unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_query_is_skipped() {
        let h = harness();
        let outcome = h.orchestrator.handle_query(None, request("")).await.unwrap();
        let sid = outcome.session_id();
        assert!(matches!(outcome, TurnOutcome::Skipped { .. }));
        assert_eq!(h.lookup.call_count(), 0);
        assert!(h.orchestrator.history(sid).unwrap().is_empty());
        assert!(h.speech_out.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_resubmitting_after_different_query_processes_again() {
        // Only the immediately preceding User entry suppresses a repeat.
        let h = harness();
        let sid = h
            .orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap()
            .session_id();
        h.orchestrator
            .handle_query(Some(sid), request("Go"))
            .await
            .unwrap();
        h.orchestrator
            .handle_query(Some(sid), request("Rust"))
            .await
            .unwrap();
        assert_eq!(h.lookup.call_count(), 3);
        assert_eq!(h.orchestrator.history(sid).unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_message_too_long_rejected() {
        let h = harness();
        let long = "x".repeat(ChatConfig::default().max_message_length + 1);
        let err = h
            .orchestrator
            .handle_query(None, request(&long))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MessageTooLong(_)));
    }

    #[tokio::test]
    async fn test_unknown_session_gets_fresh_one() {
        let h = harness();
        let ghost = Uuid::new_v4();
        let outcome = h
            .orchestrator
            .handle_query(Some(ghost), request("Rust"))
            .await
            .unwrap();
        // The unknown id was not resurrected; a new session was issued.
        assert_ne!(outcome.session_id(), ghost);
    }

    #[tokio::test]
    async fn test_voice_turn_flows_through_query_path() {
        let h = harness_with(
            MockLookup::with_content("An answer."),
            Some(MockSpeechInput::new(["what is rust"])),
        );
        let (heard, outcome) = h
            .orchestrator
            .handle_voice_query(None, Language::En, false)
            .await
            .unwrap();
        assert_eq!(heard, "what is rust");

        let history = h.orchestrator.history(outcome.session_id()).unwrap();
        assert_eq!(history[0].text, "what is rust");
        assert_eq!(history[1].text, "An answer.");
    }

    #[tokio::test]
    async fn test_voice_sentinel_is_processed_as_normal_query() {
        // A failed recognition still produces a turn; the sentinel is not an
        // error signal.
        let h = harness_with(
            MockLookup::with_error(LookupError::NotFound),
            Some(MockSpeechInput::new(Vec::<String>::new())),
        );
        let (heard, outcome) = h
            .orchestrator
            .handle_voice_query(None, Language::En, false)
            .await
            .unwrap();
        assert_eq!(heard, UNRECOGNIZED_UTTERANCE);
        assert!(matches!(outcome, TurnOutcome::Replied { .. }));
    }

    #[tokio::test]
    async fn test_voice_without_input_configured() {
        let h = harness();
        let err = h
            .orchestrator
            .handle_voice_query(None, Language::En, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::VoiceUnavailable));
    }

    #[tokio::test]
    async fn test_export_transcript() {
        let h = harness();
        let sid = h
            .orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap()
            .session_id();
        let transcript = h.orchestrator.export_transcript(sid).unwrap();
        assert_eq!(transcript, "You: Rust\nBot: Rust is a language.");
    }

    #[tokio::test]
    async fn test_list_and_delete_sessions() {
        let h = harness();
        let sid = h
            .orchestrator
            .handle_query(None, request("Rust"))
            .await
            .unwrap()
            .session_id();

        let summaries = h.orchestrator.list_sessions().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, sid);
        assert_eq!(summaries[0].entry_count, 2);

        h.orchestrator.delete_session(sid).unwrap();
        assert!(h.orchestrator.list_sessions().unwrap().is_empty());
        assert!(matches!(
            h.orchestrator.history(sid),
            Err(ChatError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_unknown_session() {
        let h = harness();
        let err = h.orchestrator.delete_session(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound(_)));
    }
}
