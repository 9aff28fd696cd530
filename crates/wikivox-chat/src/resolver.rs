//! Query resolution with fallback.
//!
//! The one real decision tree in the system: resolve a query against the
//! encyclopedia, falling back to web search on a missing page, and flatten
//! every failure into user-visible reply text. Nothing here returns an error
//! to the caller.
//!
//! Error priority is fixed and significant: an ambiguous title is reported
//! before a missing page, and the fallback search runs only after a missing
//! page. Both conditions can arise from the same underlying request.

use std::sync::Arc;

use tracing::{debug, warn};

use wikivox_core::types::QueryRequest;
use wikivox_lookup::{KnowledgeLookup, LookupError};
use wikivox_search::FallbackSearch;

/// Plain text to display and speak. Disambiguation candidates are flattened
/// into the text; no structured metadata is retained.
pub type ResolutionResult = String;

/// How many candidate titles an ambiguity reply lists.
const MAX_SUGGESTIONS: usize = 3;

/// Resolves one query into reply text.
pub struct QueryResolver {
    lookup: Arc<dyn KnowledgeLookup>,
    fallback: Arc<dyn FallbackSearch>,
}

impl QueryResolver {
    pub fn new(lookup: Arc<dyn KnowledgeLookup>, fallback: Arc<dyn FallbackSearch>) -> Self {
        Self { lookup, fallback }
    }

    /// Resolve `request` into reply text. Infallible: every lookup or search
    /// failure becomes part of the reply.
    pub async fn resolve(&self, request: &QueryRequest) -> ResolutionResult {
        let outcome = self
            .lookup
            .fetch(&request.text, request.language, request.full_article)
            .await;

        match outcome {
            Ok(text) => text,
            Err(LookupError::Ambiguous(candidates)) => {
                debug!(candidates = candidates.len(), "Ambiguous query");
                format!(
                    "Ambiguous! Try: {}",
                    candidates
                        .iter()
                        .take(MAX_SUGGESTIONS)
                        .cloned()
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Err(LookupError::NotFound) => {
                debug!(query = %request.text, "No page found; falling back to web search");
                match self.fallback.top_snippet(&request.text).await {
                    Ok(Some(snippet)) => snippet,
                    Ok(None) => "No Bing data found.".to_string(),
                    Err(e) => {
                        warn!(error = %e, "Fallback search failed");
                        format!("Bing search error: {}", e)
                    }
                }
            }
            Err(LookupError::Request(message)) => {
                warn!(error = %message, "Lookup failed");
                format!("Error occurred: {}", message)
            }
        }
    }
}
