//! Transcript export.

use crate::log::ConversationLog;

/// File name offered for the downloaded transcript.
pub const EXPORT_FILENAME: &str = "chat_history.txt";

/// Render the whole log as `"Speaker: text"` lines joined by newlines.
///
/// Uses the display labels (`You` / `Bot`), matching the on-screen chat.
pub fn render_transcript(log: &ConversationLog) -> String {
    log.entries()
        .iter()
        .map(|entry| format!("{}: {}", entry.speaker.label(), entry.text))
        .collect::<Vec<_>>()
        .join("\n")
}
