//! Web search adapter.
//!
//! Wraps a [`WebSearch`] client with the allow-list and absorbs every
//! provider failure into an empty result list.

use crate::client::{SearchResult, WebSearch};
use crate::domains::DomainFilter;
use std::sync::Arc;

/// Domain-restricted, failure-absorbing search.
#[derive(Clone)]
pub struct WebSearchAdapter {
    client: Arc<dyn WebSearch>,
    filter: DomainFilter,
    max_results: usize,
}

impl WebSearchAdapter {
    pub fn new(client: Arc<dyn WebSearch>, filter: DomainFilter, max_results: usize) -> Self {
        Self {
            client,
            filter,
            max_results,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn filter(&self) -> &DomainFilter {
        &self.filter
    }

    /// Search the allowed domains.
    ///
    /// Issues one provider request. Results on hosts outside the allow-list
    /// are dropped, duplicate URLs are collapsed, and at most `max_results`
    /// remain. Transport and status errors yield an empty list.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let narrowed = self.filter.narrow_query(query);
        let raw = match self.client.search(&narrowed, self.max_results).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Web search via {} failed: {}", self.provider_name(), e);
                return Vec::new();
            }
        };

        let total = raw.len();
        let mut kept: Vec<SearchResult> = Vec::new();
        for result in raw {
            if !self.filter.allows(&result.url) {
                tracing::debug!("Dropping result outside allow-list: {}", result.url);
                continue;
            }
            if kept.iter().any(|k| k.url == result.url) {
                continue;
            }
            kept.push(result);
            if kept.len() >= self.max_results {
                break;
            }
        }

        tracing::debug!(
            "Web search kept {} of {} results from {}",
            kept.len(),
            total,
            self.provider_name()
        );
        kept
    }
}
