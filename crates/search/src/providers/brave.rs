//! Brave Search provider.
//!
//! Brave Search API: https://api.search.brave.com/app/documentation/web-search

use crate::client::{rank_score, SearchResult, WebSearch};
use crate::types::ProviderType;
use serde::Deserialize;
use sinapsi_core::{AppError, AppResult};
use std::time::Duration;

/// Brave caps `count` at 20.
const MAX_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Brave Search client.
pub struct BraveClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl BraveClient {
    /// Create a client against the public endpoint.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        Self::with_endpoint(api_key, ProviderType::Brave.default_endpoint(), timeout_secs)
    }

    /// Create a client against a custom endpoint.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            client,
        })
    }

    fn convert_response(response: BraveResponse, limit: usize) -> Vec<SearchResult> {
        let results = response.web.map(|w| w.results).unwrap_or_default();
        let total = results.len();

        results
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(rank, r)| {
                SearchResult::new(r.title, r.url, r.description, rank_score(rank, total))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl WebSearch for BraveClient {
    fn provider_name(&self) -> &str {
        "brave"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchResult>> {
        let count = limit.clamp(1, MAX_COUNT).to_string();
        tracing::debug!("Brave search: {:?} (count {})", query, count);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send request to Brave: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Brave API error ({}): {}",
                status, body
            )));
        }

        let parsed: BraveResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse Brave response: {}", e)))?;

        Ok(Self::convert_response(parsed, limit))
    }
}
