//! MediaWiki Action API client.
//!
//! Fetches plain-text extracts from `https://{lang}.wikipedia.org/w/api.php`
//! and classifies the outcome: content, disambiguation page (with candidate
//! titles fetched best-effort), or missing page. No explicit request timeout
//! is set; the reqwest client default applies. No retries.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use wikivox_core::config::LookupConfig;
use wikivox_core::types::Language;

use crate::{KnowledgeLookup, LookupError};

/// How many candidate titles to request for a disambiguation page.
const CANDIDATE_LIMIT: usize = 5;

/// Encyclopedia client backed by the public MediaWiki Action API.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: reqwest::Client,
    summary_sentences: u32,
}

impl WikipediaClient {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            summary_sentences: config.summary_sentences,
        }
    }

    /// API endpoint for the given language subdomain.
    fn endpoint(language: Language) -> String {
        format!("https://{}.wikipedia.org/w/api.php", language.as_str())
    }

    /// Fetch candidate titles for an ambiguous query via full-text search.
    ///
    /// Best effort: any failure yields an empty list rather than masking the
    /// ambiguity outcome.
    async fn candidate_titles(&self, query: &str, language: Language) -> Vec<String> {
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("list", "search"),
            ("srsearch", query),
            ("srlimit", "6"),
        ];

        let result = async {
            let response = self
                .http
                .get(Self::endpoint(language))
                .query(&params)
                .send()
                .await?
                .error_for_status()?;
            response.json::<SearchResponse>().await
        }
        .await;

        match result {
            Ok(body) => {
                let mut titles: Vec<String> = body
                    .query
                    .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
                    .unwrap_or_default();
                // The disambiguation page itself often ranks first; drop it.
                titles.retain(|t| !t.eq_ignore_ascii_case(query));
                titles.truncate(CANDIDATE_LIMIT);
                titles
            }
            Err(e) => {
                debug!(error = %e, "Candidate title search failed");
                vec![]
            }
        }
    }
}

#[async_trait]
impl KnowledgeLookup for WikipediaClient {
    async fn fetch(
        &self,
        query: &str,
        language: Language,
        full_article: bool,
    ) -> Result<String, LookupError> {
        let sentences = self.summary_sentences.to_string();
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("prop", "extracts|pageprops"),
            ("ppprop", "disambiguation"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("titles", query),
        ];
        if !full_article {
            params.push(("exsentences", sentences.as_str()));
        }

        let response = self
            .http
            .get(Self::endpoint(language))
            .query(&params)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        match interpret(body)? {
            PageOutcome::Content(text) => Ok(text),
            PageOutcome::Disambiguation => {
                let candidates = self.candidate_titles(query, language).await;
                debug!(count = candidates.len(), "Disambiguation page hit");
                Err(LookupError::Ambiguous(candidates))
            }
        }
    }
}

// =============================================================================
// Response decoding
// =============================================================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    /// Present (as an empty string) when the page is a disambiguation page.
    disambiguation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchBody>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

enum PageOutcome {
    Content(String),
    Disambiguation,
}

/// Classify a decoded query response.
///
/// Priority: disambiguation before missing; a disambiguation page has an
/// extract too, so the marker must be checked first.
fn interpret(body: QueryResponse) -> Result<PageOutcome, LookupError> {
    let page = body
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or(LookupError::NotFound)?;

    if page.pageprops.and_then(|p| p.disambiguation).is_some() {
        return Ok(PageOutcome::Disambiguation);
    }
    if page.missing {
        return Err(LookupError::NotFound);
    }

    match page.extract {
        Some(text) if !text.trim().is_empty() => Ok(PageOutcome::Content(text)),
        _ => Err(LookupError::Request("page returned no extract".to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> QueryResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_endpoint_per_language() {
        assert_eq!(
            WikipediaClient::endpoint(Language::En),
            "https://en.wikipedia.org/w/api.php"
        );
        assert_eq!(
            WikipediaClient::endpoint(Language::De),
            "https://de.wikipedia.org/w/api.php"
        );
    }

    #[test]
    fn test_interpret_content_page() {
        let body = decode(
            r#"{"query":{"pages":[{"pageid":1,"title":"Rust","extract":"Rust is a language."}]}}"#,
        );
        match interpret(body).unwrap() {
            PageOutcome::Content(text) => assert_eq!(text, "Rust is a language."),
            _ => panic!("expected content"),
        }
    }

    #[test]
    fn test_interpret_missing_page() {
        let body = decode(r#"{"query":{"pages":[{"title":"Xyzzy","missing":true}]}}"#);
        assert!(matches!(interpret(body), Err(LookupError::NotFound)));
    }

    #[test]
    fn test_interpret_disambiguation_page() {
        let body = decode(
            r#"{"query":{"pages":[{"title":"Mercury","extract":"Mercury may refer to:","pageprops":{"disambiguation":""}}]}}"#,
        );
        assert!(matches!(
            interpret(body),
            Ok(PageOutcome::Disambiguation)
        ));
    }

    #[test]
    fn test_interpret_disambiguation_wins_over_missing() {
        // Both markers on one page: ambiguity takes priority.
        let body = decode(
            r#"{"query":{"pages":[{"title":"X","missing":true,"pageprops":{"disambiguation":""}}]}}"#,
        );
        assert!(matches!(
            interpret(body),
            Ok(PageOutcome::Disambiguation)
        ));
    }

    #[test]
    fn test_interpret_no_pages_is_not_found() {
        let body = decode(r#"{"query":{"pages":[]}}"#);
        assert!(matches!(interpret(body), Err(LookupError::NotFound)));

        let body = decode(r#"{}"#);
        assert!(matches!(interpret(body), Err(LookupError::NotFound)));
    }

    #[test]
    fn test_interpret_empty_extract_is_request_error() {
        let body = decode(r#"{"query":{"pages":[{"title":"Blank","extract":"  "}]}}"#);
        assert!(matches!(interpret(body), Err(LookupError::Request(_))));
    }

    #[test]
    fn test_search_response_decoding() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"query":{"search":[{"title":"Mercury (planet)"},{"title":"Mercury (element)"}]}}"#,
        )
        .unwrap();
        let titles: Vec<String> = body
            .query
            .unwrap()
            .search
            .into_iter()
            .map(|h| h.title)
            .collect();
        assert_eq!(titles, vec!["Mercury (planet)", "Mercury (element)"]);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_summary_lookup() {
        let client = WikipediaClient::new(&LookupConfig::default());
        let text = client
            .fetch("Rust (programming language)", Language::En, false)
            .await
            .unwrap();
        assert!(text.contains("Rust"));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_missing_page() {
        let client = WikipediaClient::new(&LookupConfig::default());
        let err = client
            .fetch("zxqv-definitely-not-a-page-9c4f", Language::En, false)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound));
    }
}
