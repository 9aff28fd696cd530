//! Knowledge lookup client for WikiVox.
//!
//! Provides a trait-based abstraction over an encyclopedia backend, a
//! MediaWiki implementation, and a mock for testing. The error type
//! distinguishes ambiguous titles (carrying candidate titles) from missing
//! pages, which the query resolver relies on for its fallback policy.

pub mod wikipedia;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use wikivox_core::error::WikivoxError;
use wikivox_core::types::Language;

pub use wikipedia::WikipediaClient;

// =============================================================================
// Error type
// =============================================================================

/// Errors from an encyclopedia lookup.
///
/// `Ambiguous` must be checked before `NotFound` by callers: both can arise
/// from the same underlying request, and ambiguity takes priority.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    /// The query matched a disambiguation page; carries candidate titles
    /// (possibly empty if candidates could not be fetched).
    #[error("ambiguous title with {} candidates", .0.len())]
    Ambiguous(Vec<String>),
    /// No page exists for the query.
    #[error("no matching page")]
    NotFound,
    /// Transport or decode failure. Displays as the bare message; callers
    /// add their own prefix.
    #[error("{0}")]
    Request(String),
}

impl From<LookupError> for WikivoxError {
    fn from(err: LookupError) -> Self {
        WikivoxError::Lookup(err.to_string())
    }
}

// =============================================================================
// Trait
// =============================================================================

/// Service that resolves a query against an encyclopedia.
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Fetch the article text for `query` in `language`.
    ///
    /// Returns a short fixed-length summary unless `full_article` is set.
    async fn fetch(
        &self,
        query: &str,
        language: Language,
        full_article: bool,
    ) -> Result<String, LookupError>;
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Mock lookup returning a programmed response, for tests.
///
/// Counts calls so duplicate-suppression tests can assert that no lookup
/// was issued.
pub struct MockLookup {
    response: Mutex<Result<String, LookupError>>,
    calls: AtomicUsize,
}

impl MockLookup {
    /// Mock that succeeds with `text` for every call.
    pub fn with_content(text: impl Into<String>) -> Self {
        Self {
            response: Mutex::new(Ok(text.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Mock that fails with `err` for every call.
    pub fn with_error(err: LookupError) -> Self {
        Self {
            response: Mutex::new(Err(err)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch` calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeLookup for MockLookup {
    async fn fetch(
        &self,
        _query: &str,
        _language: Language,
        _full_article: bool,
    ) -> Result<String, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .map_err(|e| LookupError::Request(format!("mock lock poisoned: {}", e)))?
            .clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
