//! Fallback web-search client for WikiVox.
//!
//! Issued only after the encyclopedia lookup reports a missing page. Queries
//! the SerpAPI Bing engine and returns the first organic result's snippet.
//! A fixed short timeout bounds the request; there are no retries.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use wikivox_core::config::SearchConfig;
use wikivox_core::error::WikivoxError;

// =============================================================================
// Error type
// =============================================================================

/// Errors from the fallback search.
///
/// Displays as the bare message; the query resolver adds its own prefix.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    #[error("{0}")]
    Request(String),
}

impl From<SearchError> for WikivoxError {
    fn from(err: SearchError) -> Self {
        WikivoxError::Search(err.to_string())
    }
}

// =============================================================================
// Trait
// =============================================================================

/// Service that returns a snippet for a free-text web query.
#[async_trait]
pub trait FallbackSearch: Send + Sync {
    /// Return the first organic result's snippet, or `None` if the response
    /// carried no organic results.
    async fn top_snippet(&self, query: &str) -> Result<Option<String>, SearchError>;
}

// =============================================================================
// SerpAPI client
// =============================================================================

/// SerpAPI client using the Bing engine.
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SerpApiClient {
    /// Build a client from config. The API key comes from the
    /// `WIKIVOX_SERPAPI_KEY` env var when set, else from the config file.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.resolve_api_key(),
        })
    }
}

#[async_trait]
impl FallbackSearch for SerpApiClient {
    async fn top_snippet(&self, query: &str) -> Result<Option<String>, SearchError> {
        let params = [
            ("engine", "bing"),
            ("q", query),
            ("api_key", self.api_key.as_str()),
        ];

        let response = self
            .http
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let snippet = first_snippet(body);
        debug!(found = snippet.is_some(), "Fallback search completed");
        Ok(snippet)
    }
}

// =============================================================================
// Response decoding
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    snippet: Option<String>,
}

/// Extract the first organic result's snippet, if any.
fn first_snippet(body: SearchResponse) -> Option<String> {
    body.organic_results
        .into_iter()
        .next()
        .and_then(|result| result.snippet)
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock fallback search returning a programmed response, for tests.
pub struct MockSearch {
    response: Result<Option<String>, SearchError>,
    calls: AtomicUsize,
}

impl MockSearch {
    /// Mock that returns `Some(snippet)` for every call.
    pub fn with_snippet(snippet: impl Into<String>) -> Self {
        Self {
            response: Ok(Some(snippet.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that returns an empty result set.
    pub fn empty() -> Self {
        Self {
            response: Ok(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that fails with `message` for every call.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(SearchError::Request(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `top_snippet` calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FallbackSearch for MockSearch {
    async fn top_snippet(&self, _query: &str) -> Result<Option<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_first_snippet_present() {
        let body = decode(r#"{"organic_results":[{"snippet":"X"},{"snippet":"Y"}]}"#);
        assert_eq!(first_snippet(body), Some("X".to_string()));
    }

    #[test]
    fn test_first_snippet_empty_results() {
        let body = decode(r#"{"organic_results":[]}"#);
        assert_eq!(first_snippet(body), None);

        let body = decode(r#"{}"#);
        assert_eq!(first_snippet(body), None);
    }

    #[test]
    fn test_first_snippet_missing_field() {
        let body = decode(r#"{"organic_results":[{"title":"no snippet here"}]}"#);
        assert_eq!(first_snippet(body), None);
    }

    #[test]
    fn test_client_from_config() {
        let client = SerpApiClient::new(&SearchConfig::default()).unwrap();
        assert_eq!(client.endpoint, "https://serpapi.com/search.json");
    }

    #[test]
    fn test_error_displays_bare_message() {
        let err = SearchError::Request("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
    }

    #[tokio::test]
    async fn test_mock_snippet() {
        let mock = MockSearch::with_snippet("X");
        assert_eq!(mock.top_snippet("q").await.unwrap(), Some("X".to_string()));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_empty_and_failing() {
        let empty = MockSearch::empty();
        assert_eq!(empty.top_snippet("q").await.unwrap(), None);

        let failing = MockSearch::failing("no route");
        let err = failing.top_snippet("q").await.unwrap_err();
        assert_eq!(err.to_string(), "no route");
    }
}
