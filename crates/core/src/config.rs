//! Configuration management for Sinapsi.
//!
//! Configuration is merged from several layers, later layers winning:
//! - Built-in defaults
//! - A YAML config file (`--config`, `SINAPSI_CONFIG`, or `./sinapsi.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! Missing credentials are never an error here: the search layer degrades
//! to an empty provider when the selected provider has no key.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Search providers understood by the search crate.
pub const KNOWN_PROVIDERS: [&str; 2] = ["brave", "bing"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Config file that was merged, if any
    pub config_file: Option<PathBuf>,

    /// Active web search provider ("brave" or "bing")
    pub provider: String,

    /// Brave Search subscription token
    #[serde(skip_serializing)]
    pub brave_api_key: Option<String>,

    /// Bing Web Search subscription key
    #[serde(skip_serializing)]
    pub bing_api_key: Option<String>,

    /// Optional Brave endpoint override
    pub brave_endpoint: Option<String>,

    /// Optional Bing endpoint override
    pub bing_endpoint: Option<String>,

    /// Allow-list of domains whose pages may be fetched and cited
    pub preferred_domains: Vec<String>,

    /// Minimum web relevance score. Read and carried, never compared.
    pub min_web_score: f32,

    /// Result cap passed to the search provider
    pub max_results: usize,

    /// Timeout for the outbound search request
    pub search_timeout_secs: u64,

    /// Timeout for each page fetch
    pub fetch_timeout_secs: u64,

    /// Rule directories in priority order
    pub rules_dirs: Vec<PathBuf>,

    /// Internal connector catalog (JSON or YAML)
    pub connectors_file: Option<PathBuf>,

    /// HTTP bind address
    pub bind: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    search: Option<SearchSection>,
    fetch: Option<FetchSection>,
    rules: Option<RulesSection>,
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SearchSection {
    provider: Option<String>,
    #[serde(rename = "preferredDomains")]
    preferred_domains: Option<Vec<String>>,
    #[serde(rename = "minWebScore")]
    min_web_score: Option<f32>,
    #[serde(rename = "maxResults")]
    max_results: Option<usize>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
    #[serde(rename = "braveEndpoint")]
    brave_endpoint: Option<String>,
    #[serde(rename = "bingEndpoint")]
    bing_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FetchSection {
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RulesSection {
    dirs: Option<Vec<PathBuf>>,
    #[serde(rename = "connectorsFile")]
    connectors_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServerSection {
    bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "brave".to_string(),
            brave_api_key: None,
            bing_api_key: None,
            brave_endpoint: None,
            bing_endpoint: None,
            preferred_domains: vec![
                "tecnaria.com".to_string(),
                "spit.eu".to_string(),
                "spitpaslode.com".to_string(),
            ],
            min_web_score: 0.35,
            max_results: 5,
            search_timeout_secs: 6,
            fetch_timeout_secs: 4,
            rules_dirs: vec![PathBuf::from("sinapsi"), PathBuf::from("static/data")],
            connectors_file: Some(PathBuf::from("static/data/tecnaria_connettori_dati.json")),
            bind: "0.0.0.0:8000".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and an optional file.
    ///
    /// Environment variables:
    /// - `SINAPSI_CONFIG`: Path to YAML config file (when `config_file` is `None`)
    /// - `WEB_SEARCH_PROVIDER`: `brave` or `bing`
    /// - `BRAVE_API_KEY`, `BING_API_KEY`: provider credentials
    /// - `PREFERRED_DOMAINS`: comma-separated allow-list
    /// - `MIN_WEB_SCORE`: reserved relevance threshold
    /// - `SINAPSI_DIR`: rule directory, tried before the defaults
    /// - `SINAPSI_CONNECTORS`: internal connector catalog file
    /// - `SINAPSI_BIND`: HTTP bind address
    /// - `SEARCH_TIMEOUT_SECS`, `FETCH_TIMEOUT_SECS`: per-call timeouts
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use sinapsi_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Provider: {}", config.provider);
    /// ```
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        Self::load_from(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using a custom variable lookup.
    pub fn load_from<F>(config_file: Option<PathBuf>, env: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = config_file.or_else(|| env("SINAPSI_CONFIG").map(PathBuf::from));
        let config_path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from("sinapsi.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if let Some(path) = explicit {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                path
            )));
        }

        config.apply_env(env);
        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();
        result.config_file = Some(path.to_path_buf());

        if let Some(search) = file.search {
            if let Some(provider) = search.provider {
                result.provider = provider.to_lowercase();
            }
            if let Some(domains) = search.preferred_domains {
                result.preferred_domains = normalize_domain_list(domains);
            }
            if let Some(score) = search.min_web_score {
                result.min_web_score = score;
            }
            if let Some(max) = search.max_results {
                result.max_results = max;
            }
            if let Some(secs) = search.timeout_secs {
                result.search_timeout_secs = secs;
            }
            if search.brave_endpoint.is_some() {
                result.brave_endpoint = search.brave_endpoint;
            }
            if search.bing_endpoint.is_some() {
                result.bing_endpoint = search.bing_endpoint;
            }
        }

        if let Some(secs) = file.fetch.and_then(|f| f.timeout_secs) {
            result.fetch_timeout_secs = secs;
        }

        if let Some(rules) = file.rules {
            if let Some(dirs) = rules.dirs {
                result.rules_dirs = dirs;
            }
            if rules.connectors_file.is_some() {
                result.connectors_file = rules.connectors_file;
            }
        }

        if let Some(bind) = file.server.and_then(|s| s.bind) {
            result.bind = bind;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Environment variables override the YAML config.
    fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = non_empty(env("WEB_SEARCH_PROVIDER")) {
            self.provider = provider.to_lowercase();
        }

        if let Some(key) = non_empty(env("BRAVE_API_KEY")) {
            self.brave_api_key = Some(key);
        }

        if let Some(key) = non_empty(env("BING_API_KEY")) {
            self.bing_api_key = Some(key);
        }

        if let Some(raw) = non_empty(env("PREFERRED_DOMAINS")) {
            self.preferred_domains = parse_domain_list(&raw);
        }

        if let Some(score) = env("MIN_WEB_SCORE").and_then(|v| v.trim().parse::<f32>().ok()) {
            self.min_web_score = score;
        }

        if let Some(dir) = non_empty(env("SINAPSI_DIR")) {
            self.rules_dirs.insert(0, PathBuf::from(dir));
        }

        if let Some(path) = non_empty(env("SINAPSI_CONNECTORS")) {
            self.connectors_file = Some(PathBuf::from(path));
        }

        if let Some(bind) = non_empty(env("SINAPSI_BIND")) {
            self.bind = bind;
        }

        if let Some(secs) = env("SEARCH_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.search_timeout_secs = secs;
        }

        if let Some(secs) = env("FETCH_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.fetch_timeout_secs = secs;
        }

        if let Some(level) = non_empty(env("RUST_LOG")) {
            self.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            self.no_color = true;
        }
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        bind: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider.to_lowercase();
        }

        if let Some(bind) = bind {
            self.bind = bind;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Credential for the given provider, if configured.
    pub fn api_key_for(&self, provider: &str) -> Option<&str> {
        match provider {
            "brave" => self.brave_api_key.as_deref(),
            "bing" => self.bing_api_key.as_deref(),
            _ => None,
        }
    }

    /// Endpoint override for the given provider, if configured.
    pub fn endpoint_for(&self, provider: &str) -> Option<&str> {
        match provider {
            "brave" => self.brave_endpoint.as_deref(),
            "bing" => self.bing_endpoint.as_deref(),
            _ => None,
        }
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown search provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.search_timeout_secs == 0 || self.fetch_timeout_secs == 0 {
            return Err(AppError::Config(
                "Timeouts must be greater than zero seconds".to_string(),
            ));
        }

        if self.max_results == 0 {
            return Err(AppError::Config(
                "search.maxResults must be >= 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Split a comma-separated domain list.
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    normalize_domain_list(raw.split(',').map(str::to_string))
}

fn normalize_domain_list<I>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for domain in domains {
        let domain = domain.trim().to_lowercase();
        if !domain.is_empty() && !out.contains(&domain) {
            out.push(domain);
        }
    }
    out
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
