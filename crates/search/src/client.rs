//! Search client abstraction and result type.

use serde::{Deserialize, Serialize};
use sinapsi_core::AppResult;

/// A single web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title as reported by the provider
    pub title: String,

    /// Absolute page URL
    pub url: String,

    /// Provider-supplied description of the page
    #[serde(default)]
    pub snippet: String,

    /// Relevance score in `[0, 1]`
    #[serde(default)]
    pub score: f32,
}

impl SearchResult {
    /// Create a search result.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        score: f32,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            score,
        }
    }
}

/// Trait for web search providers.
///
/// Implementations issue exactly one outbound request per call and report
/// transport or status failures as errors; absorbing them is the adapter's
/// job.
#[async_trait::async_trait]
pub trait WebSearch: Send + Sync {
    /// Get the provider name (e.g., "brave", "bing").
    fn provider_name(&self) -> &str;

    /// Run a query, returning at most `limit` results.
    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchResult>>;
}

/// Score results by rank for providers that do not return one.
pub(crate) fn rank_score(rank: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    1.0 - (rank as f32 / total as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_score_descends() {
        assert_eq!(rank_score(0, 4), 1.0);
        assert_eq!(rank_score(2, 4), 0.5);
        assert!(rank_score(3, 4) > 0.0);
        assert_eq!(rank_score(0, 0), 0.0);
    }
}
