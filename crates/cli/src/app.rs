//! Pipeline assembly from configuration.

use sinapsi_answer::{AnswerPipeline, HttpFetcher, Synthesizer};
use sinapsi_core::{config::AppConfig, AppError, AppResult};
use sinapsi_rules::{ConnectorCatalog, RuleStore};
use sinapsi_search::{create_client, DomainFilter, WebSearchAdapter};
use std::sync::Arc;

/// Build the answer pipeline described by `config`.
///
/// Missing credentials and rule files are not errors; they disable the
/// corresponding feature.
pub fn build_pipeline(config: &AppConfig) -> AppResult<AnswerPipeline> {
    let provider = config.provider.as_str();
    let client = create_client(
        provider,
        config.api_key_for(provider),
        config.endpoint_for(provider),
        config.search_timeout_secs,
    )
    .map_err(AppError::Config)?;

    let filter = DomainFilter::new(&config.preferred_domains);
    tracing::debug!("Preferred domains: {:?}", filter.domains());
    let search = WebSearchAdapter::new(client, filter, config.max_results);

    let fetcher = HttpFetcher::new(config.fetch_timeout_secs)?;
    let rules = RuleStore::load(&config.rules_dirs);
    let connectors = ConnectorCatalog::load(config.connectors_file.as_deref());

    Ok(AnswerPipeline::new(
        Arc::new(rules),
        search,
        Synthesizer::new(Arc::new(fetcher)),
    )
    .with_connectors(Arc::new(connectors)))
}
