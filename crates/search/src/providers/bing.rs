//! Bing Web Search provider.
//!
//! Bing Web Search API v7: https://learn.microsoft.com/bing/search-apis/bing-web-search/

use crate::client::{rank_score, SearchResult, WebSearch};
use crate::types::ProviderType;
use serde::Deserialize;
use sinapsi_core::{AppError, AppResult};
use std::time::Duration;

const MAX_COUNT: usize = 50;

/// Results are requested for the Italian market.
const MARKET: &str = "it-IT";

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingPage>,
}

#[derive(Debug, Deserialize)]
struct BingPage {
    #[serde(default)]
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
}

/// Bing Web Search client.
pub struct BingClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl BingClient {
    /// Create a client against the public endpoint.
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        Self::with_endpoint(api_key, ProviderType::Bing.default_endpoint(), timeout_secs)
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

    fn convert_response(response: BingResponse, limit: usize) -> Vec<SearchResult> {
        let pages = response.web_pages.map(|w| w.value).unwrap_or_default();
        let total = pages.len();

        pages
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(rank, p)| SearchResult::new(p.name, p.url, p.snippet, rank_score(rank, total)))
            .collect()
    }
}

#[async_trait::async_trait]
impl WebSearch for BingClient {
    fn provider_name(&self) -> &str {
        "bing"
    }

    async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<SearchResult>> {
        let count = limit.clamp(1, MAX_COUNT).to_string();
        tracing::debug!("Bing search: {:?} (count {})", query, count);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[("q", query), ("count", count.as_str()), ("mkt", MARKET)])
            .send()
            .await
            .map_err(|e| AppError::Search(format!("Failed to send request to Bing: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Search(format!(
                "Bing API error ({}): {}",
                status, body
            )));
        }

        let parsed: BingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Search(format!("Failed to parse Bing response: {}", e)))?;

        Ok(Self::convert_response(parsed, limit))
    }
}
