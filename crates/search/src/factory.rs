//! Search provider factory.
//!
//! Creates the search client selected by configuration. A provider without
//! credentials is not an error: it resolves to [`NoopSearch`], which always
//! returns an empty result list.

use crate::client::WebSearch;
use crate::providers::{BingClient, BraveClient, NoopSearch};
use crate::types::ProviderType;
use std::sync::Arc;

/// Create a search client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("brave", "bing")
/// * `api_key` - Credential for that provider, if configured
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout_secs` - Per-request timeout
///
/// # Errors
/// Returns error if the provider is unknown or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    api_key: Option<&str>,
    endpoint: Option<&str>,
    timeout_secs: u64,
) -> Result<Arc<dyn WebSearch>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;

    let api_key = match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => {
            tracing::warn!(
                "No API key configured for {}; web search disabled",
                provider_type.as_str()
            );
            return Ok(Arc::new(NoopSearch::new(provider_type.as_str())));
        }
    };

    let endpoint = endpoint.unwrap_or(provider_type.default_endpoint());

    match provider_type {
        ProviderType::Brave => {
            let client = BraveClient::with_endpoint(api_key, endpoint, timeout_secs)
                .map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        ProviderType::Bing => {
            let client = BingClient::with_endpoint(api_key, endpoint, timeout_secs)
                .map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
    }
}
