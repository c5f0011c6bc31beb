use crate::client::{SearchResult, WebSearch};
use sinapsi_core::AppResult;

/// No-op search used when the selected provider has no credentials.
pub struct NoopSearch {
    provider: String,
}

impl NoopSearch {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }
}

#[async_trait::async_trait]
impl WebSearch for NoopSearch {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn search(&self, _query: &str, _limit: usize) -> AppResult<Vec<SearchResult>> {
        tracing::debug!("NoopSearch: no API key configured for {}", self.provider);
        Ok(vec![])
    }
}
