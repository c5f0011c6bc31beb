//! Page fetching.
//!
//! Fetching is best effort: any failure yields `None` and the synthesizer
//! falls back to the search snippet.

use crate::html::{collapse_whitespace, html_to_text};
use async_trait::async_trait;
use sinapsi_core::{AppError, AppResult};
use std::time::Duration;

const USER_AGENT: &str = concat!("sinapsi/", env!("CARGO_PKG_VERSION"));

/// Fetches a page and returns its readable text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Readable text of `url`, or `None` if the page could not be used.
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

/// reqwest-backed fetcher with a short per-request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| AppError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> AppResult<Option<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("HTTP {} for {}", status, url)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_lowercase();

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("Failed to read body of {}: {}", url, e)))?;

        let text = if content_type.contains("html") {
            html_to_text(&body)
        } else if content_type.starts_with("text/") {
            collapse_whitespace(&body)
        } else {
            tracing::debug!("Ignoring {} content at {}", content_type, url);
            return Ok(None);
        };

        Ok(Some(text).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        match self.fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }
}
